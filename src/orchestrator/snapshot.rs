use crate::catalog::AssetCatalog;
use crate::domain::{
    DomainError, GroundStation, Job, Priority, ScheduleParameters, TwoLineElement,
};

/// Projects database-resident entities into one immutable parameter
/// snapshot. Ids that resolve to nothing are omitted, not errors: the
/// contract is "project what exists". `input_hash` is left unset here and
/// stamped by the hasher.
pub fn build_snapshot(
    catalog: &dyn AssetCatalog,
    satellite_ids: &[i64],
    ground_station_ids: &[i64],
    image_request_ids: &[i64],
) -> Result<ScheduleParameters, DomainError> {
    let mut two_line_elements = Vec::new();
    for id in satellite_ids {
        match catalog.satellite(*id) {
            Some(sat) => two_line_elements.push(TwoLineElement {
                name: sat.satellite_name,
                line1: sat.tle_line1,
                line2: sat.tle_line2,
            }),
            None => log::debug!("Satellite {} not found, omitting from snapshot", id),
        }
    }

    let mut ground_stations = Vec::new();
    for id in ground_station_ids {
        match catalog.ground_station(*id) {
            Some(gs) => ground_stations.push(GroundStation {
                name: gs.ground_station_name,
                latitude: gs.latitude,
                longitude: gs.longitude,
                height: gs.elevation,
                mask: gs.send_mask,
                uplink_rate: gs.uplink_rate,
                downlink_rate: gs.downlink_rate,
            }),
            None => log::debug!("Ground station {} not found, omitting from snapshot", id),
        }
    }

    let mut jobs = Vec::new();
    for id in image_request_ids {
        match catalog.image_request(*id) {
            Some(req) => jobs.push(Job::new(
                req.image_name,
                req.latitude,
                req.longitude,
                Priority::try_from(req.priority)?,
                req.image_start_time,
                req.image_end_time,
                req.delivery_time,
                None,
            )?),
            None => log::debug!("Image request {} not found, omitting from snapshot", id),
        }
    }

    Ok(ScheduleParameters {
        input_hash: None,
        two_line_elements,
        jobs,
        ground_stations,
        outage_requests: Vec::new(),
        ground_station_outage_requests: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::sample_catalog;

    #[test]
    fn snapshot_projects_existing_entities() {
        let catalog = sample_catalog();
        let params = build_snapshot(&catalog, &[5], &[9], &[42]).unwrap();

        assert_eq!(params.two_line_elements.len(), 1);
        assert_eq!(params.two_line_elements[0].name, "SAT-1");
        assert_eq!(params.ground_stations.len(), 1);
        assert_eq!(params.ground_stations[0].height, 102.5);
        assert_eq!(params.jobs.len(), 1);
        assert_eq!(params.jobs[0].priority, Priority::High);
        assert_eq!(params.input_hash, None);
        assert!(params.outage_requests.is_empty());
    }

    #[test]
    fn missing_ids_are_silently_omitted() {
        let catalog = sample_catalog();
        let params = build_snapshot(&catalog, &[5, 999], &[888, 9], &[42, 777]).unwrap();

        assert_eq!(params.two_line_elements.len(), 1);
        assert_eq!(params.ground_stations.len(), 1);
        assert_eq!(params.jobs.len(), 1);
    }

    #[test]
    fn list_order_follows_id_order() {
        let catalog = sample_catalog();
        let params = build_snapshot(&catalog, &[6, 5], &[], &[]).unwrap();
        assert_eq!(params.two_line_elements[0].name, "SAT-2");
        assert_eq!(params.two_line_elements[1].name, "SAT-1");
    }
}
