//! Menu node representation for the document tree.
//!
//! Every element of the document (tag, operation, field, response, media
//! type, schema variant...) is one `MenuNode` in an arena, addressed by its
//! index. Nodes hold a back-handle to their parent, never a forward strong
//! reference, so identity walks cannot cycle. A closed payload enum carries
//! the kind-specific structure; the handful of kinds that appear in the side
//! menu additionally respond to the activate/expand state transitions.

/// Node kinds that participate in the side menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    /// A tag group: purely structural, never individually active.
    Group,
    /// A tag section.
    Tag,
    /// A description section.
    Section,
    /// An API operation.
    Operation,
    /// A field or parameter row.
    Field,
}

/// The structural flavour of a grouping node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Tag group (`x-tagGroups` level).
    Group,
    /// Tag.
    Tag,
    /// Description section.
    Section,
}

impl GroupKind {
    /// The menu kind this grouping renders as.
    #[must_use]
    pub fn menu_kind(self) -> MenuKind {
        match self {
            Self::Group => MenuKind::Group,
            Self::Tag => MenuKind::Tag,
            Self::Section => MenuKind::Section,
        }
    }
}

/// Classification of a response status code, used for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeClass {
    /// 1xx.
    Info,
    /// 2xx, or `default` when the operation declares a success response.
    Success,
    /// 3xx.
    Redirect,
    /// 4xx/5xx, or `default` treated as the error case.
    Error,
}

impl CodeClass {
    /// Classify a status code string (`200`, `4XX`, `default`).
    ///
    /// `default_as_error` decides how a literal `default` code reads: when
    /// the operation already declares an explicit success response, its
    /// `default` entry is the error catch-all.
    #[must_use]
    pub fn classify(code: &str, default_as_error: bool) -> Self {
        if code.eq_ignore_ascii_case("default") {
            return if default_as_error { Self::Error } else { Self::Success };
        }
        match code.chars().next() {
            Some('1') => Self::Info,
            Some('2') => Self::Success,
            Some('3') => Self::Redirect,
            _ => Self::Error,
        }
    }
}

/// The child collections a node can expose to the flattener.
///
/// One node may contribute children through several semantically different
/// relations (an operation's menu children are its parameters *and* its
/// responses); the flattener recurses through these in a fixed priority
/// order so traversal stays a pure function of source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRelation {
    /// Explicit menu children (group → tags, tag → operations).
    Items,
    /// Operation parameters.
    Parameters,
    /// The media content holder of a response or request body.
    Content,
    /// The request body of an operation.
    RequestBody,
    /// The media type entries of a content holder.
    MediaTypes,
    /// The schema of a field or media type.
    Schema,
    /// The variant branches of a schema.
    Variants,
    /// The fields of a schema.
    Fields,
    /// The responses of an operation.
    Responses,
}

/// Kind-specific structure of a node.
#[derive(Debug, Clone)]
pub enum NodePayload {
    /// Structural grouping: tag group, tag or description section.
    Grouping {
        /// Which grouping level this is.
        kind: GroupKind,
    },
    /// An API operation.
    Operation {
        /// Lower-case HTTP verb.
        http_verb: String,
        /// Path template.
        path: String,
        /// Deprecation flag.
        deprecated: bool,
        /// Parameter nodes.
        parameters: Vec<usize>,
        /// Request body node.
        request_body: Option<usize>,
        /// Response nodes in declaration order.
        responses: Vec<usize>,
        /// Callback holder nodes (not part of the menu).
        callbacks: Vec<usize>,
    },
    /// A field or parameter row.
    Field {
        /// Whether the field is required.
        required: bool,
        /// Deprecation flag.
        deprecated: bool,
        /// Nested schema node.
        schema: Option<usize>,
    },
    /// A media content holder: owns the media type tabs and tracks which one
    /// is selected.
    Content {
        /// Media type nodes in declaration order.
        media_types: Vec<usize>,
        /// Index of the currently selected media type.
        active_mime_idx: usize,
        /// Whether this holder belongs to a request body.
        is_request: bool,
    },
    /// One media type tab under a content holder.
    MediaType {
        /// MIME string.
        mime: String,
        /// Payload schema node.
        schema: Option<usize>,
    },
    /// A schema, possibly with mutually-exclusive variant branches.
    Schema {
        /// Variant branch nodes (`oneOf`).
        variants: Vec<usize>,
        /// Index of the currently selected branch.
        active_variant: usize,
        /// Field nodes of an object schema.
        fields: Vec<usize>,
    },
    /// A response for one status code.
    Response {
        /// Status code string.
        code: String,
        /// Presentation classification of the code.
        code_class: CodeClass,
        /// Header field nodes.
        headers: Vec<usize>,
        /// Content holder node.
        content: Option<usize>,
    },
    /// A request body.
    RequestBody {
        /// Whether a body must be supplied.
        required: bool,
        /// Content holder node.
        content: Option<usize>,
    },
    /// A named callback holding out-of-band operations. Held for rendering
    /// but never flattened into the menu.
    Callback {
        /// Operation nodes invoked on the consumer.
        operations: Vec<usize>,
    },
}

#[derive(Debug, Clone)]
/// One node of the document arena.
///
/// Identity fields (`id`, `parent`, the two discriminators) are fixed at
/// construction; the transient fields (`active`, `expanded`, selections
/// inside the payload) are mutated by the store and by direct user toggles
/// for the life of the view.
pub struct MenuNode {
    /// This node's own arena index.
    pub idx: usize,
    /// Arena index of the parent node, if any.
    pub parent: Option<usize>,
    /// Path-like identifier derived from the parent chain. Stable and
    /// globally unique once the tree is built.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Nesting level; levels at or below the configured group depth are
    /// structural and refuse activation.
    pub depth: usize,
    /// Which variant branch of an ancestor schema this subtree was
    /// generated under, if any.
    pub target_variant: Option<usize>,
    /// Which media type tab of an ancestor content holder this subtree was
    /// generated under, if any.
    pub target_content: Option<usize>,
    /// Position in the flattened menu sequence, assigned once after
    /// construction; absent for nodes that are not menu items.
    pub absolute_idx: Option<usize>,
    /// Whether this node is the active menu item.
    pub active: bool,
    /// Disclosure state. `None` means never touched, which is distinct from
    /// an explicit `Some(false)`.
    pub expanded: Option<bool>,
    /// Explicit menu children, in order.
    pub items: Vec<usize>,
    /// Kind-specific structure.
    pub payload: NodePayload,
}

impl MenuNode {
    /// The menu kind of this node, or `None` for kinds that never appear as
    /// menu items (content holders, media types, schemas, responses, bodies,
    /// callbacks).
    #[must_use]
    pub fn menu_kind(&self) -> Option<MenuKind> {
        match &self.payload {
            NodePayload::Grouping { kind } => Some(kind.menu_kind()),
            NodePayload::Operation { .. } => Some(MenuKind::Operation),
            NodePayload::Field { .. } => Some(MenuKind::Field),
            _ => None,
        }
    }

    /// Whether this node is eligible for the deactivation collapse walk:
    /// groups, tags, sections and operations collapse; fields and bare
    /// content holders never do.
    #[must_use]
    pub fn is_legit_menu_item(&self) -> bool {
        matches!(
            self.menu_kind(),
            Some(MenuKind::Group | MenuKind::Tag | MenuKind::Section | MenuKind::Operation)
        )
    }

    /// Mark the node active. Fields take no visible active state of their
    /// own (the row highlight follows the store's active index instead).
    pub fn activate(&mut self) {
        if self.is_legit_menu_item() {
            self.active = true;
        }
    }

    /// Clear the node's active mark.
    pub fn deactivate(&mut self) {
        if self.is_legit_menu_item() {
            self.active = false;
        }
    }

    /// Open the node's disclosure, when it has one.
    pub fn expand(&mut self) {
        if self.is_legit_menu_item() {
            self.expanded = Some(true);
        }
    }

    /// Close the node's disclosure, when it has one.
    pub fn collapse(&mut self) {
        if self.is_legit_menu_item() {
            self.expanded = Some(false);
        }
    }

    /// Flip the disclosure of a field or response row.
    pub fn toggle(&mut self) {
        match self.payload {
            NodePayload::Field { .. } | NodePayload::Response { .. } => {
                self.expanded = Some(!self.expanded.unwrap_or(false));
            }
            _ => {}
        }
    }

    /// The children reachable through one relation, in source order.
    #[must_use]
    pub fn related(&self, relation: ChildRelation) -> &[usize] {
        match (relation, &self.payload) {
            (ChildRelation::Items, _) => &self.items,
            (ChildRelation::Parameters, NodePayload::Operation { parameters, .. }) => parameters,
            (ChildRelation::Content, NodePayload::Response { content, .. })
            | (ChildRelation::Content, NodePayload::RequestBody { content, .. })
            | (ChildRelation::RequestBody, NodePayload::Operation { request_body: content, .. })
            | (ChildRelation::Schema, NodePayload::Field { schema: content, .. })
            | (ChildRelation::Schema, NodePayload::MediaType { schema: content, .. }) => {
                content.as_slice()
            }
            (ChildRelation::MediaTypes, NodePayload::Content { media_types, .. }) => media_types,
            (ChildRelation::Variants, NodePayload::Schema { variants, .. }) => variants,
            (ChildRelation::Fields, NodePayload::Schema { fields, .. }) => fields,
            (ChildRelation::Responses, NodePayload::Operation { responses, .. }) => responses,
            _ => &[],
        }
    }
}
