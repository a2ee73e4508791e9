pub mod hash;
pub mod output;
pub mod params;

pub use hash::input_hash;
pub use output::{PlannedOrder, ScheduleOutput, SchedulingInputOutputData};
pub use params::{
    DomainError, GroundStation, GroundStationOutageRequest, Job, OutageRequest, Priority,
    ScheduleParameters, TwoLineElement,
};
