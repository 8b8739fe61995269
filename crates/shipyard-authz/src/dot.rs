//! GraphViz DOT rendering of simplified permission trees.
//!
//! ```text
//! dot -Tpng -o tree.png tree.dot
//! ```

use crate::tree::{Operation, PermissionNode};

const OPERATION_FILL_COLOR: &str = "#d3d3e3";

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotOptions {
    /// Indent nested lines and separate them with newlines.
    pub pretty: bool,
    /// Spaces per nesting level when `pretty`.
    pub indent: usize,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 1,
        }
    }
}

/// Render trees as a `digraph`, one dashed cluster per root.
pub fn render_dot(roots: &[PermissionNode], options: &DotOptions) -> String {
    let mut graph = DotGraph {
        options,
        next_id: 1,
        level: 0,
        lines: Vec::new(),
    };

    graph.push("digraph G {");
    graph.level = 1;
    for root in roots {
        graph.add_cluster("", root);
    }
    graph.level = 0;
    graph.push("}");

    graph
        .lines
        .join(if options.pretty { "\n" } else { "" })
}

struct DotGraph<'a> {
    options: &'a DotOptions,
    next_id: usize,
    level: usize,
    lines: Vec<String>,
}

impl DotGraph<'_> {
    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, line: impl AsRef<str>) {
        let indent = if self.options.pretty {
            " ".repeat(self.level * self.options.indent)
        } else {
            String::new()
        };
        self.lines.push(format!("{}{}", indent, line.as_ref()));
    }

    fn add_cluster(&mut self, label: &str, node: &PermissionNode) -> usize {
        let id = self.next_id();
        self.push(format!("subgraph cluster_{} {{", id));
        self.level += 1;
        self.push("style=\"dashed\";");
        self.push(format!("label=\"{}\";", escape_label(label)));
        self.add_node(node, None);
        self.level -= 1;
        self.push("}");
        id
    }

    fn add_node(&mut self, node: &PermissionNode, parent: Option<usize>) -> usize {
        let header = outlined_list(&[node.relation.as_str(), node.object.as_str()], "center");
        let node_id = self.add_html_node(&header, "black");

        if let Some(parent) = parent {
            self.add_edge(parent, node_id);
        }

        if !node.children.is_empty() {
            let parent_id = match node.operation {
                Some(operation) => {
                    let shape = if operation == Operation::Union {
                        "trapezium"
                    } else {
                        "invtrapezium"
                    };
                    let op_id = self.add_label_node(&operation.as_str().to_lowercase(), shape);
                    self.add_edge(node_id, op_id);
                    op_id
                }
                None => node_id,
            };

            for child in &node.children {
                self.add_node(child, Some(parent_id));
            }
        }

        if !node.subjects.is_empty() {
            let subjects: Vec<&str> = node.subjects.iter().map(String::as_str).collect();
            let list_id = self.add_html_node(&outlined_list(&subjects, "left"), "none");
            self.add_edge(node_id, list_id);
        }

        node_id
    }

    fn add_label_node(&mut self, label: &str, shape: &str) -> usize {
        let id = self.next_id();
        self.push(format!(
            "{} [label=\"{}\", shape=\"{}\", fillcolor=\"{}\", color=\"{}\", style=\"filled\"];",
            id,
            escape_label(label),
            shape,
            OPERATION_FILL_COLOR,
            OPERATION_FILL_COLOR
        ));
        id
    }

    fn add_html_node(&mut self, html: &str, color: &str) -> usize {
        let id = self.next_id();
        self.push(format!(
            "{} [label=<{}>, shape=\"plain\", color=\"{}\"];",
            id, html, color
        ));
        id
    }

    fn add_edge(&mut self, from: usize, to: usize) {
        self.push(format!("{} -> {};", from, to));
    }
}

/// Inner borderless table wrapped in an outlined, centered one.
fn outlined_list(rows: &[&str], align: &str) -> String {
    let escaped: Vec<String> = rows.iter().map(|r| escape_html(r)).collect();
    let inner = rows_table(&escaped, align, 1, 0);
    rows_table(&[inner], "center", 4, 1)
}

fn rows_table(rows: &[String], align: &str, cellpadding: u32, cellborder: u32) -> String {
    let mut html = format!(
        "<table border=\"0\" cellspacing=\"0\" cellpadding=\"{}\" cellborder=\"{}\">",
        cellpadding, cellborder
    );
    for row in rows {
        html.push_str(&format!("<tr><td align=\"{}\">{}</td></tr>", align, row));
    }
    html.push_str("</table>");
    html
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_label(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(relation: &str, object: &str) -> PermissionNode {
        PermissionNode::new(relation, object)
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render_dot(&[], &DotOptions::default()), "digraph G {\n}");
    }

    #[test]
    fn test_single_node_layout() {
        let dot = render_dot(&[node("edit", "form:form_a")], &DotOptions::default());
        let lines: Vec<&str> = dot.lines().collect();

        assert_eq!(lines[0], "digraph G {");
        assert_eq!(lines[1], " subgraph cluster_1 {");
        assert_eq!(lines[2], "  style=\"dashed\";");
        assert_eq!(lines[3], "  label=\"\";");
        assert_eq!(
            lines[4],
            "  2 [label=<<table border=\"0\" cellspacing=\"0\" cellpadding=\"4\" cellborder=\"1\">\
             <tr><td align=\"center\"><table border=\"0\" cellspacing=\"0\" cellpadding=\"1\" \
             cellborder=\"0\"><tr><td align=\"center\">edit</td></tr><tr><td align=\"center\">\
             form:form_a</td></tr></table></td></tr></table>>, shape=\"plain\", color=\"black\"];"
        );
        assert_eq!(lines[5], " }");
        assert_eq!(lines[6], "}");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_children_and_edges() {
        let mut root = node("edit", "form:form_a");
        root.children.push(node("view", "form:form_b"));

        let dot = render_dot(&[root], &DotOptions::default());
        assert!(dot.contains("form:form_b"));
        assert!(dot.contains("  2 -> 3;"));
    }

    #[test]
    fn test_operation_shapes() {
        let mut leaf = node("crew", "starship:orion");
        leaf.subjects = vec!["user:riker".into(), "crew:bridge#member".into()];

        let mut union = node("board", "starship:orion");
        union.operation = Some(Operation::Union);
        union.children = vec![leaf.clone(), node("guest", "starship:orion")];

        let mut exclusion = node("operate", "starship:orion");
        exclusion.operation = Some(Operation::Exclusion);
        exclusion.children = vec![leaf];

        let dot = render_dot(&[union, exclusion], &DotOptions::default());

        assert!(dot.contains(
            "[label=\"union\", shape=\"trapezium\", fillcolor=\"#d3d3e3\", \
             color=\"#d3d3e3\", style=\"filled\"];"
        ));
        assert!(dot.contains("[label=\"exclusion\", shape=\"invtrapezium\""));
        assert!(dot.contains("<td align=\"left\">crew:bridge#member</td>"));
        assert!(dot.contains("shape=\"plain\", color=\"none\"];"));
        assert!(dot.contains("subgraph cluster_1 {"));
        // second root gets the next free id after the first cluster's nodes
        assert!(dot.contains("subgraph cluster_7 {"));
    }

    #[test]
    fn test_compact_output() {
        let options = DotOptions {
            pretty: false,
            indent: 1,
        };
        let dot = render_dot(&[node("edit", "form:form_a")], &options);
        assert!(dot.starts_with("digraph G {subgraph cluster_1 {style=\"dashed\";"));
        assert!(!dot.contains('\n'));
        assert!(dot.ends_with("}}"));
    }

    #[test]
    fn test_html_is_escaped() {
        let dot = render_dot(&[node("a<b", "x:y&z")], &DotOptions::default());
        assert!(dot.contains("a&lt;b"));
        assert!(dot.contains("x:y&amp;z"));
    }
}
