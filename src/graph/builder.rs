use std::collections::{HashSet, VecDeque};

use crate::graph::{GraphData, GraphLink, GraphNode, NodeGroup};
use crate::lockfile::PackageLock;

const ROOT_SIZE: u32 = 20;
const BASE_SIZE: usize = 5;
const MAX_SIZE: usize = 30;

pub fn build_graph(lock: &PackageLock) -> GraphData {
    let mut data = GraphData::default();
    if lock.root().is_none() {
        return data;
    }

    let root_name = lock.root_name().to_string();
    let mut emitted: HashSet<String> = HashSet::new();
    data.nodes.push(GraphNode {
        id: root_name.clone(),
        group: NodeGroup::Root,
        size: ROOT_SIZE,
    });
    emitted.insert(root_name.clone());

    let top_level = top_level_deps(lock);
    for (name, group) in &top_level {
        let count = count_transitive_deps(name, lock);
        let size = (BASE_SIZE + count).min(MAX_SIZE) as u32;
        if emitted.insert(name.to_string()) {
            data.nodes.push(GraphNode {
                id: name.to_string(),
                group: *group,
                size,
            });
        }
        data.links.push(GraphLink {
            source: root_name.clone(),
            target: name.to_string(),
        });
    }

    for (name, _) in &top_level {
        if let Some(pkg) = lock.package(name) {
            for dep_name in pkg.dependencies.keys() {
                if emitted.insert(dep_name.clone()) {
                    data.nodes.push(GraphNode {
                        id: dep_name.clone(),
                        group: NodeGroup::Transitive,
                        size: BASE_SIZE as u32,
                    });
                }
                data.links.push(GraphLink {
                    source: name.to_string(),
                    target: dep_name.clone(),
                });
            }
        }
    }

    data
}

pub fn top_level_deps(lock: &PackageLock) -> Vec<(&str, NodeGroup)> {
    let root = match lock.root() {
        Some(root) => root,
        None => return Vec::new(),
    };
    let mut top_level: Vec<(&str, NodeGroup)> = Vec::new();
    let mut claimed: HashSet<&str> = HashSet::new();
    for name in root.dependencies.keys() {
        if claimed.insert(name) {
            top_level.push((name, NodeGroup::Prod));
        }
    }
    for name in root.dev_dependencies.keys() {
        if claimed.insert(name) {
            top_level.push((name, NodeGroup::Dev));
        }
    }
    top_level
}

pub fn count_transitive_deps(name: &str, lock: &PackageLock) -> usize {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    seen.insert(name);
    queue.push_back(name);
    let mut count = 0;

    while let Some(current) = queue.pop_front() {
        let pkg = match lock.package(current) {
            Some(pkg) => pkg,
            None => continue,
        };
        for dep_name in pkg.dependencies.keys() {
            if seen.insert(dep_name) {
                count += 1;
                queue.push_back(dep_name);
            }
        }
    }

    count
}
