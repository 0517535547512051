use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::{GraphData, GraphLink, NodeGroup};

pub type Adjacency = HashMap<String, Vec<String>>;

pub fn build_adjacency(data: &GraphData) -> Adjacency {
    let mut adjacency: Adjacency = HashMap::new();
    for node in &data.nodes {
        adjacency.entry(node.id.clone()).or_default();
    }
    for link in &data.links {
        adjacency
            .entry(link.source.clone())
            .or_default()
            .push(link.target.clone());
        adjacency
            .entry(link.target.clone())
            .or_default()
            .push(link.source.clone());
    }
    adjacency
}

pub fn compute_visible(
    data: &GraphData,
    adjacency: &Adjacency,
    visible_groups: &HashSet<NodeGroup>,
) -> HashSet<String> {
    let mut visible: HashSet<String> = data
        .nodes
        .iter()
        .filter(|node| visible_groups.contains(&node.group))
        .map(|node| node.id.clone())
        .collect();

    let prunable: Vec<&str> = data
        .nodes
        .iter()
        .filter(|node| node.group != NodeGroup::Root)
        .map(|node| node.id.as_str())
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for id in &prunable {
            if !visible.contains(*id) {
                continue;
            }
            let has_visible_neighbor = adjacency
                .get(*id)
                .map(|neighbors| neighbors.iter().any(|n| visible.contains(n)))
                .unwrap_or(false);
            if !has_visible_neighbor {
                visible.remove(*id);
                changed = true;
            }
        }
    }

    visible
}

pub fn compute_reachable(
    data: &GraphData,
    adjacency: &Adjacency,
    selected: &str,
) -> HashSet<String> {
    let root_id = data.root().map(|node| node.id.as_str());
    let mut reachable: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    reachable.insert(selected.to_string());
    queue.push_back(selected.to_string());

    while let Some(current) = queue.pop_front() {
        let neighbors = match adjacency.get(&current) {
            Some(neighbors) => neighbors,
            None => continue,
        };
        for neighbor in neighbors {
            if reachable.insert(neighbor.clone()) {
                if root_id != Some(neighbor.as_str()) {
                    queue.push_back(neighbor.clone());
                }
            }
        }
    }

    reachable
}

#[derive(Debug)]
pub struct ViewerState {
    visible_groups: HashSet<NodeGroup>,
    selected: Option<String>,
    adjacency: Adjacency,
}

impl ViewerState {
    pub fn new(data: &GraphData) -> Self {
        Self {
            visible_groups: NodeGroup::ALL.into_iter().collect(),
            selected: None,
            adjacency: build_adjacency(data),
        }
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn visible_groups(&self) -> &HashSet<NodeGroup> {
        &self.visible_groups
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn set_group_visible(&mut self, group: NodeGroup, visible: bool) {
        if visible {
            self.visible_groups.insert(group);
        } else {
            self.visible_groups.remove(&group);
        }
    }

    pub fn toggle_group(&mut self, group: NodeGroup) {
        if !self.visible_groups.remove(&group) {
            self.visible_groups.insert(group);
        }
    }

    pub fn click(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.to_string());
        }
    }

    pub fn click_background(&mut self) {
        self.selected = None;
    }

    pub fn visible_nodes(&self, data: &GraphData) -> HashSet<String> {
        compute_visible(data, &self.adjacency, &self.visible_groups)
    }

    pub fn visible_links<'a>(&self, data: &'a GraphData) -> Vec<&'a GraphLink> {
        let visible = self.visible_nodes(data);
        data.links
            .iter()
            .filter(|link| visible.contains(&link.source) && visible.contains(&link.target))
            .collect()
    }

    pub fn reachable(&self, data: &GraphData) -> Option<HashSet<String>> {
        self.selected
            .as_deref()
            .map(|selected| compute_reachable(data, &self.adjacency, selected))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::graph::builder::build_graph;
    use crate::graph::{GraphData, NodeGroup};
    use crate::lockfile::PackageLock;
    use crate::viewer::{build_adjacency, compute_reachable, compute_visible, ViewerState};

    fn example_graph() -> GraphData {
        let lock = PackageLock::parse(
            r#"{
                "name": "app",
                "packages": {
                    "": {
                        "dependencies": {"left-pad": "^1.3.0"},
                        "devDependencies": {"mocha": "^10.0.0"}
                    },
                    "node_modules/left-pad": {},
                    "node_modules/mocha": {"dependencies": {"ms": "2.1.3"}},
                    "node_modules/ms": {}
                }
            }"#,
        )
        .expect("parse lockfile");
        build_graph(&lock)
    }

    fn names(set: &HashSet<String>) -> Vec<&str> {
        let mut out: Vec<&str> = set.iter().map(String::as_str).collect();
        out.sort();
        out
    }

    #[test]
    fn adjacency_is_undirected() {
        let data = example_graph();
        let adjacency = build_adjacency(&data);
        assert!(adjacency["app"].contains(&"mocha".to_string()));
        assert!(adjacency["mocha"].contains(&"app".to_string()));
        assert!(adjacency["ms"].contains(&"mocha".to_string()));
    }

    #[test]
    fn all_groups_checked_shows_everything() {
        let data = example_graph();
        let state = ViewerState::new(&data);
        let visible = state.visible_nodes(&data);
        assert_eq!(names(&visible), vec!["app", "left-pad", "mocha", "ms"]);
        assert_eq!(state.visible_links(&data).len(), 3);
    }

    #[test]
    fn hiding_dev_prunes_orphaned_transitives() {
        let data = example_graph();
        let mut state = ViewerState::new(&data);
        state.set_group_visible(NodeGroup::Dev, false);

        let visible = state.visible_nodes(&data);
        assert_eq!(names(&visible), vec!["app", "left-pad"]);

        let links = state.visible_links(&data);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "left-pad");
    }

    #[test]
    fn root_survives_pruning_when_checked() {
        let data = example_graph();
        let mut state = ViewerState::new(&data);
        state.set_group_visible(NodeGroup::Prod, false);
        state.set_group_visible(NodeGroup::Dev, false);
        state.set_group_visible(NodeGroup::Transitive, false);

        let visible = state.visible_nodes(&data);
        assert_eq!(names(&visible), vec!["app"]);
        assert!(state.visible_links(&data).is_empty());
    }

    #[test]
    fn hiding_root_orphans_its_direct_leaves() {
        let data = example_graph();
        let mut state = ViewerState::new(&data);
        state.toggle_group(NodeGroup::Root);

        let visible = state.visible_nodes(&data);
        assert_eq!(names(&visible), vec!["mocha", "ms"]);
    }

    #[test]
    fn pruning_reaches_fixed_point_on_chains() {
        let lock = PackageLock::parse(
            r#"{
                "name": "app",
                "packages": {
                    "": {"dependencies": {"a": "*"}},
                    "node_modules/a": {"dependencies": {"b": "*"}},
                    "node_modules/b": {}
                }
            }"#,
        )
        .expect("parse lockfile");
        let data = build_graph(&lock);
        let mut state = ViewerState::new(&data);
        state.set_group_visible(NodeGroup::Prod, false);

        let visible = state.visible_nodes(&data);
        assert_eq!(names(&visible), vec!["app"]);
    }

    #[test]
    fn selection_toggles_and_clears() {
        let data = example_graph();
        let mut state = ViewerState::new(&data);
        assert!(state.reachable(&data).is_none());

        state.click("mocha");
        assert_eq!(state.selected(), Some("mocha"));
        state.click("mocha");
        assert_eq!(state.selected(), None);

        state.click("mocha");
        state.click("left-pad");
        assert_eq!(state.selected(), Some("left-pad"));
        state.click_background();
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn reachability_stops_at_the_root() {
        let data = example_graph();
        let mut state = ViewerState::new(&data);
        state.click("mocha");

        let reachable = state.reachable(&data).expect("selection active");
        assert_eq!(names(&reachable), vec!["app", "mocha", "ms"]);
    }

    #[test]
    fn selecting_the_root_reaches_everything_here() {
        let data = example_graph();
        let adjacency = build_adjacency(&data);
        let reachable = compute_reachable(&data, &adjacency, "app");
        assert_eq!(names(&reachable), vec!["app", "left-pad", "mocha", "ms"]);
    }

    #[test]
    fn reachability_explores_deep_subtrees() {
        let lock = PackageLock::parse(
            r#"{
                "name": "app",
                "packages": {
                    "": {"dependencies": {"a": "*", "z": "*"}},
                    "node_modules/a": {"dependencies": {"b": "*"}},
                    "node_modules/b": {"dependencies": {"c": "*"}},
                    "node_modules/z": {}
                }
            }"#,
        )
        .expect("parse lockfile");
        let data = build_graph(&lock);
        let adjacency = build_adjacency(&data);

        let reachable = compute_reachable(&data, &adjacency, "b");
        assert_eq!(names(&reachable), vec!["a", "app", "b"]);
    }

    #[test]
    fn visibility_and_selection_are_independent() {
        let data = example_graph();
        let mut state = ViewerState::new(&data);
        state.click("mocha");
        state.set_group_visible(NodeGroup::Dev, false);

        let visible = state.visible_nodes(&data);
        assert_eq!(names(&visible), vec!["app", "left-pad"]);
        state.click_background();
        assert_eq!(names(&state.visible_nodes(&data)), vec!["app", "left-pad"]);
    }

    #[test]
    fn visible_set_ignores_examination_order() {
        let data = example_graph();
        let adjacency = build_adjacency(&data);
        let groups: HashSet<NodeGroup> =
            [NodeGroup::Root, NodeGroup::Prod, NodeGroup::Transitive]
                .into_iter()
                .collect();

        let mut reversed = data.clone();
        reversed.nodes.reverse();
        let forward = compute_visible(&data, &adjacency, &groups);
        let backward = compute_visible(&reversed, &adjacency, &groups);
        assert_eq!(forward, backward);
    }
}
