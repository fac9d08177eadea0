//! The document arena and the builder that populates it.
//!
//! Construction flows root-to-child (a parent pushes itself first, then
//! builds its children with its own handle injected) while identity flows
//! child-to-root (every id is the parent id plus a kind-specific suffix).
//! The arena owns every node; parents are back-handles only, so the menu
//! graph is a tree by construction and id derivation cannot cycle.

use crate::config::Config;
use crate::error::DocumentError;
use crate::node::{CodeClass, GroupKind, MenuNode, NodePayload};
use crate::resolved;
use std::collections::HashSet;

/// The constructed node family for one loaded document.
pub struct DocumentTree {
    nodes: Vec<MenuNode>,
    roots: Vec<usize>,
}

impl DocumentTree {
    /// Build the node family from a resolved document.
    ///
    /// Description sections come first, then tag groups (or bare tags when
    /// the document declares no groups), then a synthetic `Webhooks` tag
    /// when webhook operations exist.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::DuplicateId`] when two distinct nodes derive
    /// the same identifier; ids are the lookup key for activation and
    /// history, so a collision is a construction defect.
    pub fn build(doc: &resolved::Document, config: &Config) -> Result<Self, DocumentError> {
        let mut builder = Builder {
            nodes: Vec::new(),
            config,
        };
        let mut roots = Vec::new();

        for section in &doc.sections {
            roots.push(builder.section(section, None));
        }

        if doc.groups.is_empty() {
            for tag in &doc.tags {
                roots.push(builder.tag(tag, None, 1));
            }
        } else {
            for group in &doc.groups {
                roots.push(builder.group(group, &doc.tags));
            }
        }

        if !doc.webhooks.is_empty() {
            roots.push(builder.webhooks_tag(&doc.webhooks));
        }

        let tree = Self {
            nodes: builder.nodes,
            roots,
        };
        tree.validate_ids()?;
        Ok(tree)
    }

    fn validate_ids(&self) -> Result<(), DocumentError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(DocumentError::DuplicateId(node.id.clone()));
            }
        }
        Ok(())
    }

    #[must_use]
    /// Top-level node handles in outline order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    #[must_use]
    /// Borrow a node by handle.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a handle issued by this tree.
    pub fn node(&self, idx: usize) -> &MenuNode {
        &self.nodes[idx]
    }

    /// Mutably borrow a node by handle.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a handle issued by this tree.
    pub fn node_mut(&mut self, idx: usize) -> &mut MenuNode {
        &mut self.nodes[idx]
    }

    #[must_use]
    /// Borrow a node by handle, if it exists.
    pub fn get(&self, idx: usize) -> Option<&MenuNode> {
        self.nodes.get(idx)
    }

    #[must_use]
    /// Total node count, menu-eligible or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    /// Whether the tree holds no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Select a media type tab on a content holder. Out-of-range indices and
    /// non-holder handles are ignored.
    pub fn select_media(&mut self, holder: usize, mime_idx: usize) {
        if let Some(MenuNode {
            payload:
                NodePayload::Content {
                    media_types,
                    active_mime_idx,
                    ..
                },
            ..
        }) = self.nodes.get_mut(holder)
        {
            if mime_idx < media_types.len() {
                *active_mime_idx = mime_idx;
            }
        }
    }

    /// Select a variant branch on a schema. Out-of-range indices and
    /// non-schema handles are ignored.
    pub fn select_variant(&mut self, schema: usize, variant: usize) {
        if let Some(MenuNode {
            payload:
                NodePayload::Schema {
                    variants,
                    active_variant,
                    ..
                },
            ..
        }) = self.nodes.get_mut(schema)
        {
            if variant < variants.len() {
                *active_variant = variant;
            }
        }
    }
}

/// Root-to-child construction state: the growing arena plus the options that
/// seed response disclosure.
struct Builder<'a> {
    nodes: Vec<MenuNode>,
    config: &'a Config,
}

impl Builder<'_> {
    fn push(
        &mut self,
        parent: Option<usize>,
        id: String,
        name: String,
        depth: usize,
        payload: NodePayload,
    ) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(MenuNode {
            idx,
            parent,
            id,
            name,
            depth,
            target_variant: None,
            target_content: None,
            absolute_idx: None,
            active: false,
            expanded: None,
            items: Vec::new(),
            payload,
        });
        idx
    }

    fn parent_id(&self, parent: usize) -> &str {
        &self.nodes[parent].id
    }

    fn section(&mut self, section: &resolved::DocSection, parent: Option<usize>) -> usize {
        // Only tag groups sit at the structural depth 0; sections start at 1
        // so they can be activated.
        let (id, depth) = match parent {
            Some(p) => (
                format!("{}/{}", self.parent_id(p), slugify(&section.name)),
                self.nodes[p].depth + 1,
            ),
            None => (format!("section/{}", slugify(&section.name)), 1),
        };
        let idx = self.push(
            parent,
            id,
            section.name.clone(),
            depth,
            NodePayload::Grouping {
                kind: GroupKind::Section,
            },
        );
        let items: Vec<usize> = section
            .children
            .iter()
            .map(|child| self.section(child, Some(idx)))
            .collect();
        self.nodes[idx].items = items;
        idx
    }

    fn group(&mut self, group: &resolved::TagGroup, tags: &[resolved::Tag]) -> usize {
        let idx = self.push(
            None,
            format!("group/{}", slugify(&group.name)),
            group.name.clone(),
            0,
            NodePayload::Grouping {
                kind: GroupKind::Group,
            },
        );
        let items: Vec<usize> = group
            .tags
            .iter()
            .filter_map(|name| tags.iter().find(|t| &t.name == name))
            .map(|tag| self.tag(tag, Some(idx), 1))
            .collect();
        self.nodes[idx].items = items;
        idx
    }

    fn tag(&mut self, tag: &resolved::Tag, parent: Option<usize>, depth: usize) -> usize {
        // Tag ids are root-level regardless of grouping so that hash links
        // survive a document gaining or losing x-tagGroups.
        let idx = self.push(
            parent,
            format!("tag/{}", slugify(&tag.name)),
            tag.name.clone(),
            depth,
            NodePayload::Grouping {
                kind: GroupKind::Tag,
            },
        );
        let items: Vec<usize> = tag
            .operations
            .iter()
            .map(|op| self.operation(op, idx, depth + 1))
            .collect();
        self.nodes[idx].items = items;
        idx
    }

    fn webhooks_tag(&mut self, webhooks: &[resolved::Operation]) -> usize {
        let idx = self.push(
            None,
            "tag/webhooks".to_string(),
            "Webhooks".to_string(),
            1,
            NodePayload::Grouping {
                kind: GroupKind::Tag,
            },
        );
        let items: Vec<usize> = webhooks
            .iter()
            .map(|op| self.operation(op, idx, 2))
            .collect();
        self.nodes[idx].items = items;
        idx
    }

    fn operation(&mut self, op: &resolved::Operation, parent: usize, depth: usize) -> usize {
        let id = match &op.operation_id {
            Some(op_id) => format!("operation/{}", slugify(op_id)),
            None => format!(
                "{}/paths/{}/{}",
                self.parent_id(parent),
                slugify(&op.path),
                op.http_verb
            ),
        };
        let name = op
            .summary
            .clone()
            .or_else(|| op.operation_id.clone())
            .unwrap_or_else(|| format!("{} {}", op.http_verb.to_uppercase(), op.path));
        let idx = self.push(
            Some(parent),
            id,
            name,
            depth,
            NodePayload::Operation {
                http_verb: op.http_verb.clone(),
                path: op.path.clone(),
                deprecated: op.deprecated,
                parameters: Vec::new(),
                request_body: None,
                responses: Vec::new(),
                callbacks: Vec::new(),
            },
        );

        let parameters: Vec<usize> = op
            .parameters
            .iter()
            .map(|p| self.field(p, idx, depth + 1))
            .collect();
        let request_body = op
            .request_body
            .as_ref()
            .map(|body| self.request_body(body, idx, depth + 1));
        // `default` reads as the error catch-all once an explicit success
        // response exists.
        let default_as_error = op
            .responses
            .iter()
            .any(|r| matches!(r.code.chars().next(), Some('2' | '3')));
        let responses: Vec<usize> = op
            .responses
            .iter()
            .map(|r| self.response(r, idx, depth + 1, default_as_error))
            .collect();
        let callbacks: Vec<usize> = op
            .callbacks
            .iter()
            .map(|cb| self.callback(cb, idx, depth + 1))
            .collect();

        if let NodePayload::Operation {
            parameters: p,
            request_body: rb,
            responses: r,
            callbacks: cb,
            ..
        } = &mut self.nodes[idx].payload
        {
            *p = parameters;
            *rb = request_body;
            *r = responses;
            *cb = callbacks;
        }
        idx
    }

    fn field(&mut self, param: &resolved::Parameter, parent: usize, depth: usize) -> usize {
        let idx = self.push(
            Some(parent),
            format!("{}/{}", self.parent_id(parent), param.name),
            param.name.clone(),
            depth,
            NodePayload::Field {
                required: param.required,
                deprecated: param.deprecated,
                schema: None,
            },
        );
        let schema = param
            .schema
            .as_ref()
            .map(|s| self.schema(s, idx, depth + 1, None));
        if let NodePayload::Field { schema: slot, .. } = &mut self.nodes[idx].payload {
            *slot = schema;
        }
        idx
    }

    fn schema_field(&mut self, field: &resolved::SchemaField, parent: usize, depth: usize) -> usize {
        let idx = self.push(
            Some(parent),
            format!("{}/{}", self.parent_id(parent), field.name),
            field.name.clone(),
            depth,
            NodePayload::Field {
                required: field.required,
                deprecated: field.deprecated,
                schema: None,
            },
        );
        let schema = field
            .schema
            .as_deref()
            .map(|s| self.schema(s, idx, depth + 1, None));
        if let NodePayload::Field { schema: slot, .. } = &mut self.nodes[idx].payload {
            *slot = schema;
        }
        idx
    }

    fn schema(
        &mut self,
        schema: &resolved::Schema,
        parent: usize,
        depth: usize,
        variant: Option<usize>,
    ) -> usize {
        let id = match variant {
            Some(branch) => format!("{}/oneof/{branch}", self.parent_id(parent)),
            None => format!("{}/schema", self.parent_id(parent)),
        };
        let name = schema.title.clone().unwrap_or_else(|| "schema".to_string());
        let idx = self.push(
            Some(parent),
            id,
            name,
            depth,
            NodePayload::Schema {
                variants: Vec::new(),
                active_variant: 0,
                fields: Vec::new(),
            },
        );
        // Record which branch of the parent schema this subtree belongs to;
        // the visibility walk carries it up to the owning selector.
        self.nodes[idx].target_variant = variant;

        let variants: Vec<usize> = schema
            .one_of
            .iter()
            .enumerate()
            .map(|(branch, sub)| self.schema(sub, idx, depth + 1, Some(branch)))
            .collect();
        let fields: Vec<usize> = schema
            .fields
            .iter()
            .map(|f| self.schema_field(f, idx, depth + 1))
            .collect();
        if let NodePayload::Schema {
            variants: v,
            fields: f,
            ..
        } = &mut self.nodes[idx].payload
        {
            *v = variants;
            *f = fields;
        }
        idx
    }

    fn content(
        &mut self,
        media: &[resolved::MediaType],
        parent: usize,
        depth: usize,
        is_request: bool,
    ) -> usize {
        // A fixed suffix: reusing the parent id here would collide with it.
        let idx = self.push(
            Some(parent),
            format!("{}/content", self.parent_id(parent)),
            "content".to_string(),
            depth,
            NodePayload::Content {
                media_types: Vec::new(),
                active_mime_idx: 0,
                is_request,
            },
        );
        let media_types: Vec<usize> = media
            .iter()
            .enumerate()
            .map(|(mime_idx, mt)| self.media_type(mt, idx, depth + 1, mime_idx))
            .collect();
        if let NodePayload::Content { media_types: m, .. } = &mut self.nodes[idx].payload {
            *m = media_types;
        }
        idx
    }

    fn media_type(
        &mut self,
        media: &resolved::MediaType,
        parent: usize,
        depth: usize,
        mime_idx: usize,
    ) -> usize {
        let idx = self.push(
            Some(parent),
            format!("{}/{}", self.parent_id(parent), media.mime),
            media.mime.clone(),
            depth,
            NodePayload::MediaType {
                mime: media.mime.clone(),
                schema: None,
            },
        );
        self.nodes[idx].target_content = Some(mime_idx);
        let schema = media
            .schema
            .as_ref()
            .map(|s| self.schema(s, idx, depth + 1, None));
        if let NodePayload::MediaType { schema: slot, .. } = &mut self.nodes[idx].payload {
            *slot = schema;
        }
        idx
    }

    fn request_body(&mut self, body: &resolved::RequestBody, parent: usize, depth: usize) -> usize {
        let idx = self.push(
            Some(parent),
            format!("{}/body", self.parent_id(parent)),
            "Request body".to_string(),
            depth,
            NodePayload::RequestBody {
                required: body.required,
                content: None,
            },
        );
        let content = if body.content.is_empty() {
            None
        } else {
            Some(self.content(&body.content, idx, depth + 1, true))
        };
        if let NodePayload::RequestBody { content: slot, .. } = &mut self.nodes[idx].payload {
            *slot = content;
        }
        idx
    }

    fn response(
        &mut self,
        response: &resolved::Response,
        parent: usize,
        depth: usize,
        default_as_error: bool,
    ) -> usize {
        let idx = self.push(
            Some(parent),
            format!("{}/{}", self.parent_id(parent), response.code),
            response.code.clone(),
            depth,
            NodePayload::Response {
                code: response.code.clone(),
                code_class: CodeClass::classify(&response.code, default_as_error),
                headers: Vec::new(),
                content: None,
            },
        );
        self.nodes[idx].expanded = Some(self.config.response_expanded(&response.code));

        let headers: Vec<usize> = response
            .headers
            .iter()
            .map(|h| self.field(h, idx, depth + 1))
            .collect();
        let content = if response.content.is_empty() {
            None
        } else {
            Some(self.content(&response.content, idx, depth + 1, false))
        };
        if let NodePayload::Response {
            headers: h,
            content: slot,
            ..
        } = &mut self.nodes[idx].payload
        {
            *h = headers;
            *slot = content;
        }
        idx
    }

    fn callback(&mut self, callback: &resolved::Callback, parent: usize, depth: usize) -> usize {
        let idx = self.push(
            Some(parent),
            format!(
                "{}/callback/{}",
                self.parent_id(parent),
                slugify(&callback.name)
            ),
            callback.name.clone(),
            depth,
            NodePayload::Callback {
                operations: Vec::new(),
            },
        );
        let operations: Vec<usize> = callback
            .operations
            .iter()
            .map(|op| self.operation(op, idx, depth + 1))
            .collect();
        if let NodePayload::Callback { operations: slot } = &mut self.nodes[idx].payload {
            *slot = operations;
        }
        idx
    }
}

/// Lower-case a name and squeeze everything non-alphanumeric to single dashes.
fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
