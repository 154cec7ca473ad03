use crate::document::Node;

/// Absolute path of a node, e.g. `/docset:Doc/dg:chunk[2]/p`
///
/// A 1-based position is added to a step only when the parent has more than
/// one element child with the same qualified name.
pub fn locate(node: Node<'_>) -> String {
    let mut steps: Vec<String> = std::iter::once(node)
        .chain(node.ancestors())
        .map(step)
        .collect();
    steps.reverse();

    format!("/{}", steps.join("/"))
}

fn step(node: Node<'_>) -> String {
    let name = node.tag_name();
    let Some(parent) = node.parent() else {
        return name.to_string();
    };

    let mut position = 0;
    let mut same_name = 0;
    for sibling in parent.element_children() {
        if sibling.tag_name() == name {
            same_name += 1;
            if sibling == node {
                position = same_name;
            }
        }
    }

    if same_name > 1 {
        format!("{}[{}]", name, position)
    } else {
        name.to_string()
    }
}
