use crate::fleet::{engine::ViewSettings, model::Host};

#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub pinned: Vec<&'a Host>,
    pub scrolling: Vec<&'a Host>,
}

/// Splits the visible hosts into the pinned and scrolling sets.
///
/// The group filter applies first. With a status filter every match scrolls
/// and nothing is pinned; otherwise critical and warning hosts are pinned.
/// Both sets are ordered by status, keeping inventory order within a status.
pub fn partition<'a>(hosts: &'a [Host], view: &ViewSettings) -> Partition<'a> {
    let mut visible: Vec<&Host> = hosts
        .iter()
        .filter(|host| {
            view.group_filter
                .as_deref()
                .is_none_or(|group| host.group_label() == group)
        })
        .collect();
    visible.sort_by_key(|host| host.status());

    match view.status_filter {
        Some(filter) => Partition {
            pinned: Vec::new(),
            scrolling: visible
                .into_iter()
                .filter(|host| host.status() == filter)
                .collect(),
        },
        None => {
            let (pinned, scrolling) = visible
                .into_iter()
                .partition(|host| host.status().needs_attention());
            Partition { pinned, scrolling }
        }
    }
}
