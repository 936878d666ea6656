use crate::domain::model::{AggregatedProject, Project};
use std::collections::HashMap;

/// Collapses a selection into one record per project id, in order of first
/// appearance. All units of an id share their derived fields, so the first
/// one stands in for the rest.
pub fn aggregate(selection: &[&Project]) -> Vec<AggregatedProject> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut aggregated: Vec<(&Project, usize)> = Vec::new();

    for &project in selection {
        match positions.get(project.id.as_str()) {
            Some(&index) => aggregated[index].1 += 1,
            None => {
                positions.insert(project.id.as_str(), aggregated.len());
                aggregated.push((project, 1));
            }
        }
    }

    aggregated
        .into_iter()
        .map(|(project, count)| AggregatedProject {
            id: project.id.clone(),
            count,
            unit_price: project.price,
            total_co2_captured: project.yearly_co2_vol * count as f64,
            remaining_std_time: project.std_time,
            finished: false,
        })
        .collect()
}
