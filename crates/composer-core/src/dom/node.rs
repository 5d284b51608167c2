use crate::offsets::utf16_len;

/// Inline formatting applied by a format container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InlineFormatType {
    /// Bold (`<strong>`).
    Bold,
    /// Italic (`<em>`).
    Italic,
    /// Strikethrough (`<del>`).
    StrikeThrough,
    /// Underline (`<u>`).
    Underline,
    /// Inline code (`<code>`).
    InlineCode,
}

impl InlineFormatType {
    /// All format types, in canonical nesting order (outermost first on ties).
    pub const ALL: [InlineFormatType; 5] = [
        InlineFormatType::Bold,
        InlineFormatType::Italic,
        InlineFormatType::StrikeThrough,
        InlineFormatType::Underline,
        InlineFormatType::InlineCode,
    ];

    /// Canonical HTML tag name.
    pub fn tag(self) -> &'static str {
        match self {
            InlineFormatType::Bold => "strong",
            InlineFormatType::Italic => "em",
            InlineFormatType::StrikeThrough => "del",
            InlineFormatType::Underline => "u",
            InlineFormatType::InlineCode => "code",
        }
    }
}

/// A style carried by an inline container: either a format or a link.
///
/// The derived ordering is the canonical nesting order used when several styles start at the
/// same position and cover the same run length.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InlineStyle {
    /// A formatting container.
    Format(InlineFormatType),
    /// A link container with its target.
    Link(String),
}

impl InlineStyle {
    /// Returns `true` for link styles.
    pub fn is_link(&self) -> bool {
        matches!(self, InlineStyle::Link(_))
    }
}

impl From<InlineFormatType> for InlineStyle {
    fn from(format: InlineFormatType) -> Self {
        InlineStyle::Format(format)
    }
}

/// List flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListType {
    /// Numbered list (`<ol>`).
    Ordered,
    /// Bulleted list (`<ul>`).
    Unordered,
}

impl ListType {
    /// Canonical HTML tag name.
    pub fn tag(self) -> &'static str {
        match self {
            ListType::Ordered => "ol",
            ListType::Unordered => "ul",
        }
    }
}

/// What a [`ContainerNode`] represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerKind {
    /// The document root. Renders only its children.
    Generic,
    /// Inline formatting.
    Format(InlineFormatType),
    /// Inline link.
    Link(String),
    /// A list of list items.
    List(ListType),
    /// One line inside a list.
    ListItem,
    /// One plain line in a multi-line document.
    Paragraph,
}

impl ContainerKind {
    /// Canonical HTML tag name (empty for the root).
    pub fn tag(&self) -> &'static str {
        match self {
            ContainerKind::Generic => "",
            ContainerKind::Format(format) => format.tag(),
            ContainerKind::Link(_) => "a",
            ContainerKind::List(list_type) => list_type.tag(),
            ContainerKind::ListItem => "li",
            ContainerKind::Paragraph => "p",
        }
    }

    /// Returns `true` for block-level containers (lists, list items, paragraphs).
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            ContainerKind::List(_) | ContainerKind::ListItem | ContainerKind::Paragraph
        )
    }

    /// The inline style this container applies, if it is an inline container.
    pub fn as_style(&self) -> Option<InlineStyle> {
        match self {
            ContainerKind::Format(format) => Some(InlineStyle::Format(*format)),
            ContainerKind::Link(url) => Some(InlineStyle::Link(url.clone())),
            _ => None,
        }
    }
}

impl From<InlineStyle> for ContainerKind {
    fn from(style: InlineStyle) -> Self {
        match style {
            InlineStyle::Format(format) => ContainerKind::Format(format),
            InlineStyle::Link(url) => ContainerKind::Link(url),
        }
    }
}

/// A container node and its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerNode {
    /// Container kind (tag + attributes).
    pub kind: ContainerKind,
    /// Child nodes, in document order.
    pub children: Vec<DomNode>,
}

impl ContainerNode {
    /// Create a container with the given children.
    pub fn new(kind: ContainerKind, children: Vec<DomNode>) -> Self {
        Self { kind, children }
    }

    /// Sum of the UTF-16 lengths of all text leaves below this container.
    pub fn leaf_len(&self) -> usize {
        self.children.iter().map(DomNode::leaf_len).sum()
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    /// A styling or block-structural wrapper.
    Container(ContainerNode),
    /// A text leaf.
    Text(String),
}

impl DomNode {
    /// Sum of the UTF-16 lengths of all text leaves in this subtree.
    pub fn leaf_len(&self) -> usize {
        match self {
            DomNode::Container(container) => container.leaf_len(),
            DomNode::Text(text) => utf16_len(text),
        }
    }

    /// The container, if this is one.
    pub fn as_container(&self) -> Option<&ContainerNode> {
        match self {
            DomNode::Container(container) => Some(container),
            DomNode::Text(_) => None,
        }
    }
}
