use crate::descriptor::{Descriptor, DescriptorClass};
use crate::error::Span;
use std::fmt;

/// Repeat count of a replication header: the `YYY` part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    Fixed(u16),
    /// `YYY == 000`: the count comes from the data, via a delayed factor.
    Delayed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicationSpec {
    /// Number of following items governed by the header (`XX`).
    pub width: u8,
    pub count: RepeatCount,
}

impl ReplicationSpec {
    pub fn from_descriptor(descriptor: &Descriptor) -> Option<Self> {
        if descriptor.class != DescriptorClass::Replication {
            return None;
        }
        let count = match descriptor.y {
            0 => RepeatCount::Delayed,
            n => RepeatCount::Fixed(n),
        };
        Some(Self { width: descriptor.x, count })
    }

    pub fn is_delayed(&self) -> bool {
        self.count == RepeatCount::Delayed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorNode {
    pub descriptor: Descriptor,
    pub span: Span,
}

#[derive(Debug)]
pub struct ReplicationNode {
    pub header: Descriptor,
    pub spec: ReplicationSpec,
    pub span: Span,
    /// The `0-31-YYY` descriptor found right after a delayed header, if any.
    pub delayed_count: Option<DescriptorNode>,
    /// Items the stream actually supplied, at most `spec.width`.
    pub children: Vec<Node>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Node {
    Descriptor(DescriptorNode),
    Replication(ReplicationNode),
    /// Placeholder for a code-shaped token that did not parse. It still
    /// occupies one slot of the enclosing replication.
    Invalid { text: String, span: Span },
}

// Nesting depth is bounded only by input size, so dropping and comparing
// bodies walk an explicit stack instead of recursing through `Vec<Node>`.
impl Drop for ReplicationNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let Node::Replication(mut replication) = node {
                pending.append(&mut replication.children);
            }
        }
    }
}

impl PartialEq for ReplicationNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.header != b.header
                || a.spec != b.spec
                || a.span != b.span
                || a.delayed_count != b.delayed_count
                || a.children.len() != b.children.len()
            {
                return false;
            }
            for pair in a.children.iter().zip(&b.children) {
                match pair {
                    (Node::Replication(x), Node::Replication(y)) => pending.push((x, y)),
                    (x, y) if x != y => return false,
                    _ => {}
                }
            }
        }
        true
    }
}

impl Eq for ReplicationNode {}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Descriptor(d) => d.span,
            Node::Replication(r) => r.span,
            Node::Invalid { span, .. } => *span,
        }
    }
}

/// Root of a parsed template.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Template {
    pub children: Vec<Node>,
}

impl Template {
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes below the root, replication bodies included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending: Vec<&Node> = self.children.iter().collect();
        while let Some(node) = pending.pop() {
            count += 1;
            if let Node::Replication(r) = node {
                pending.extend(r.children.iter());
            }
        }
        count
    }
}

fn fmt_node(node: &Node, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match node {
        Node::Descriptor(d) => {
            writeln!(f, "{}{} {} @{}", indent, d.descriptor, d.descriptor.class.name(), d.span)
        }
        Node::Invalid { text, span } => writeln!(f, "{}<invalid '{}'> @{}", indent, text, span),
        Node::Replication(r) => {
            let count = match r.spec.count {
                RepeatCount::Fixed(n) => n.to_string(),
                RepeatCount::Delayed => "delayed".to_string(),
            };
            writeln!(
                f,
                "{}{} replication width={} count={} ({}/{} present) @{}",
                indent,
                r.header,
                r.spec.width,
                count,
                r.children.len(),
                r.spec.width,
                r.span
            )?;
            if let Some(dc) = &r.delayed_count {
                let name = dc.descriptor.delayed_factor_name().unwrap_or("not a delayed factor");
                writeln!(f, "{}  [count] {} {} @{}", indent, dc.descriptor, name, dc.span)?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "template")?;
        let mut pending: Vec<(&Node, usize)> = self.children.iter().rev().map(|n| (n, 1)).collect();
        while let Some((node, depth)) = pending.pop() {
            fmt_node(node, depth, f)?;
            if let Node::Replication(r) = node {
                pending.extend(r.children.iter().rev().map(|c| (c, depth + 1)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Diagnostic;
    use crate::parser::parse_source;

    fn deep(depth: usize) -> String {
        "101002 ".repeat(depth) + "001001"
    }

    #[test]
    fn test_deep_tree_drops_and_compares_without_recursion() {
        let source = deep(300_000);
        let mut sink: Vec<Diagnostic> = Vec::new();
        let first = parse_source(&source, &mut sink);
        let second = parse_source(&source, &mut sink);

        assert!(sink.is_empty());
        assert_eq!(first.node_count(), 300_001);
        assert!(first == second);

        drop(first);
        drop(second);
    }

    #[test]
    fn test_trees_differing_deep_inside_are_unequal() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        let a = parse_source(&deep(1_000), &mut sink);
        let b = parse_source(&("101002 ".repeat(1_000) + "001002"), &mut sink);

        assert!(a != b);
    }

    #[test]
    fn test_display_is_preorder() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        let template = parse_source("102002 001001 101001 001002 001003", &mut sink);

        let lines: Vec<String> = template.to_string().lines().map(|l| l.trim().to_string()).collect();
        assert_eq!(lines[0], "template");
        assert!(lines[1].starts_with("102002 replication width=2 count=2 (2/2 present)"));
        assert!(lines[2].starts_with("001001 element"));
        assert!(lines[3].starts_with("101001 replication width=1 count=1 (1/1 present)"));
        assert!(lines[4].starts_with("001002 element"));
        assert!(lines[5].starts_with("001003 element"));
        assert_eq!(template.to_string().lines().nth(4).map(|l| l.len() - l.trim_start().len()), Some(6));
    }
}
