use indexmap::IndexMap;

/// A generic tree element that renders as a JSON object or a JSON scalar.
///
/// A node with at least one child is *complex* and becomes a JSON object;
/// otherwise it is a leaf and renders from [`Node::data`]. Labels keep the
/// order in which they were first added, and every label maps to a
/// non-empty list of children in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    children: IndexMap<String, Vec<Node>>,
    /// Scalar text. On a complex node it is written under the content label.
    pub data: String,
    /// Render every label of this node as an array, even with a single child.
    pub force_array: bool,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a leaf holding `data`.
    pub fn with_data<S: Into<String>>(data: S) -> Self {
        Node {
            data: data.into(),
            ..Self::default()
        }
    }

    /// Appends `child` under `label`.
    pub fn add_child<S: Into<String>>(&mut self, label: S, child: Node) {
        self.children.entry(label.into()).or_default().push(child);
    }

    pub fn is_complex(&self) -> bool {
        !self.children.is_empty()
    }

    /// Children grouped by label, in first-insertion order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &[Node])> {
        self.children
            .iter()
            .map(|(label, nodes)| (label.as_str(), nodes.as_slice()))
    }

    pub fn has_child(&self, label: &str) -> bool {
        self.children.contains_key(label)
    }

    /// Returns the first child at each step of a dotted path such as
    /// `"osm.node.tag"`.
    pub fn get_child(&self, path: &str) -> Option<&Node> {
        path.split('.').try_fold(self, |node, name| {
            node.children.get(name).and_then(|nodes| nodes.first())
        })
    }

    /// Like [`Node::get_child`] but for mutation, e.g. to set `force_array`.
    pub fn get_child_mut(&mut self, path: &str) -> Option<&mut Node> {
        path.split('.').try_fold(self, |node, name| {
            node.children
                .get_mut(name)
                .and_then(|nodes| nodes.first_mut())
        })
    }

    /// Returns every node reachable through a dotted path, following all
    /// children sharing a label at each step.
    pub fn get_children(&self, path: &str) -> Vec<&Node> {
        let mut current = vec![self];
        for name in path.split('.') {
            current = current
                .into_iter()
                .filter_map(|node| node.children.get(name))
                .flatten()
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }
}
