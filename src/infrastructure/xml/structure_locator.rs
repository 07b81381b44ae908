// ============================================================
// XML STRUCTURE LOCATOR
// ============================================================
// Find the first level of the tree whose children repeat

use std::collections::HashMap;

use crate::domain::source::XmlNode;

/// Locate the record group: the sibling elements that repeat at the
/// shallowest level reached by a depth-first walk in document order.
///
/// At each node the most frequent child tag is the candidate (ties go to
/// the tag encountered first). A candidate seen more than once ends the
/// search with every child carrying that tag. Otherwise each child is
/// searched in turn and the first branch that yields a group wins;
/// branches are never compared against each other.
pub fn locate_record_group(node: &XmlNode) -> Option<Vec<&XmlNode>> {
    if node.children.is_empty() {
        return None;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for child in &node.children {
        let count = counts.entry(child.tag.as_str()).or_insert(0);
        if *count == 0 {
            first_seen.push(child.tag.as_str());
        }
        *count += 1;
    }

    let mut candidate: Option<(&str, usize)> = None;
    for tag in first_seen {
        let count = counts[tag];
        if count > candidate.map_or(0, |(_, c)| c) {
            candidate = Some((tag, count));
        }
    }

    if let Some((tag, count)) = candidate {
        if count > 1 {
            return Some(node.children_with_tag(tag));
        }
    }

    node.children
        .iter()
        .find_map(|child| locate_record_group(child).filter(|group| group.len() > 1))
}
