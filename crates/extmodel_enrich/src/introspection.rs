//! Access to the markers of the implementation backing each node.
//!
//! Every node of a declaration tree is backed by implementation elements: the
//! type or method implementing a component, and the fields or parameters
//! carrying its parameters. Those elements carry declarative markers. The
//! enrichers read markers through an [`Introspector`] and never inspect the
//! implementation themselves.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use extmodel_declaration::{NodeRef, SemanticType};
use extmodel_foundation::{Error, Result, Value};

/// Marker identifiers read by the standard enrichers.
pub mod markers {
    /// Error types an extension declares. Payload: a definition or a list of them.
    pub const ERROR_TYPES: &str = "error-types";
    /// Notifications an extension declares. Payload: map `{name, type}` or a list.
    pub const NOTIFICATION_ACTIONS: &str = "notification-actions";
    /// Notifications a component fires. Payload: a name or a list of names.
    pub const FIRES: &str = "fires";
    /// The member receiving the connection.
    pub const CONNECTION: &str = "connection";
    /// The member receiving the runtime default encoding.
    pub const DEFAULT_ENCODING: &str = "default-encoding";
    /// Cluster support of a source.
    pub const CLUSTER_SUPPORT: &str = "cluster-support";
    /// Back-pressure modes of a source. Payload: map `{default, supported}`.
    pub const BACK_PRESSURE: &str = "back-pressure";
    /// An operation producing streams.
    pub const STREAMING: &str = "streaming";
    /// A parameter typed by an XML schema. Payload: the schema locator.
    pub const XML_TYPE: &str = "xml-type";
    /// A parameter typed by a JSON schema. Payload: the schema locator.
    pub const JSON_TYPE: &str = "json-type";
    /// Metadata key resolver. Payload: a resolver name or map `{resolver, category}`.
    pub const METADATA_KEYS: &str = "metadata-keys";
    /// Input metadata resolver, same payload as [`METADATA_KEYS`].
    pub const INPUT_RESOLVER: &str = "input-resolver";
    /// Output metadata resolver, same payload as [`METADATA_KEYS`].
    pub const OUTPUT_RESOLVER: &str = "output-resolver";
    /// A configuration or provider member needed to resolve metadata.
    pub const REQUIRED_FOR_METADATA: &str = "required-for-metadata";
    /// Error types a component raises. Payload: a type name or a list.
    pub const THROWS: &str = "throws";
    /// Custom stereotype. Payload: a name or map `{name, namespace, parent}`.
    pub const STEREOTYPE: &str = "stereotype";
    /// The component validates its input.
    pub const VALIDATOR: &str = "validator";
    /// Stereotypes a parameter accepts. Payload: a `stereotype` payload or a list of them.
    pub const ALLOWED_STEREOTYPES: &str = "allowed-stereotypes";
    /// A parameter receiving a chain of processors.
    pub const PROCESSOR_CHAIN: &str = "processor-chain";
    /// Stereotypes of the extension's declared types. Payload: map from type
    /// name to a `stereotype` payload or a list of them.
    pub const TYPE_STEREOTYPES: &str = "type-stereotypes";
    /// A parameter or group whose values come from a provider. Payload: a
    /// provider id or map `{provider, open, parameters, bindings, connection, config}`.
    pub const OF_VALUES: &str = "of-values";
    /// Position of a parameter among the parts of a group value. Payload: an integer.
    pub const VALUE_PART: &str = "value-part";
    /// Label shown instead of the parameter name.
    pub const DISPLAY_NAME: &str = "display-name";
    /// One-line help of a parameter.
    pub const SUMMARY: &str = "summary";
    /// Example value of a parameter.
    pub const EXAMPLE: &str = "example";
    /// Placement of a parameter. Payload: map `{order, tab}`.
    pub const PLACEMENT: &str = "placement";
    /// Masked parameter.
    pub const PASSWORD: &str = "password";
    /// Multi-line parameter.
    pub const TEXT: &str = "text";
}

/// What kind of implementation element a member is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// The type implementing a configuration, provider or source.
    Type,
    /// The method implementing an operation, function or construct.
    Method,
    /// A field of an implementing type.
    Field,
    /// A parameter of an implementing method.
    Parameter,
}

impl MemberKind {
    /// Returns true for the element implementing the node itself.
    #[must_use]
    pub const fn is_element(self) -> bool {
        matches!(self, Self::Type | Self::Method)
    }
}

/// An implementation element backing a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackingMember {
    /// Node this member backs.
    pub owner: NodeRef,
    /// Member name.
    pub name: String,
    /// Declared type of the member.
    pub declared_type: SemanticType,
    /// Markers present on the member.
    pub markers: BTreeSet<String>,
    /// Element kind.
    pub kind: MemberKind,
}

impl BackingMember {
    /// Returns true if the member carries `marker`.
    #[must_use]
    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }
}

/// Reads markers of the implementation backing a tree.
pub trait Introspector {
    /// Returns the members backing `node`, the implementing element first.
    fn backing_members(&self, node: NodeRef) -> Vec<BackingMember>;

    /// Returns the payload of `marker` on `member`.
    ///
    /// `None` when the member does not carry the marker. Markers without a
    /// payload yield [`Value::Nil`].
    fn marker_value(&self, member: &BackingMember, marker: &str) -> Option<Value>;
}

/// Returns the members of `node` carrying `marker`.
pub fn members_with_marker(
    introspector: &dyn Introspector,
    node: NodeRef,
    marker: &str,
) -> Vec<BackingMember> {
    introspector
        .backing_members(node)
        .into_iter()
        .filter(|m| m.has_marker(marker))
        .collect()
}

/// Returns the single non-element member of `node` carrying `marker`.
///
/// More than one such member is a marker conflict.
pub fn single_marked_member(
    introspector: &dyn Introspector,
    node: NodeRef,
    component: &str,
    marker: &str,
) -> Result<Option<BackingMember>> {
    let mut found: Vec<_> = members_with_marker(introspector, node, marker)
        .into_iter()
        .filter(|m| !m.kind.is_element())
        .collect();
    if found.len() > 1 {
        return Err(Error::marker_conflict(component, marker, found.len()));
    }
    Ok(found.pop())
}

/// Returns the payload of `marker` on the element implementing `node`.
pub fn element_marker(introspector: &dyn Introspector, node: NodeRef, marker: &str) -> Option<Value> {
    introspector
        .backing_members(node)
        .iter()
        .filter(|m| m.kind.is_element() && m.has_marker(marker))
        .find_map(|m| introspector.marker_value(m, marker))
}

/// Returns the payload of `marker` on any member backing `node`.
pub fn any_marker(introspector: &dyn Introspector, node: NodeRef, marker: &str) -> Option<Value> {
    introspector
        .backing_members(node)
        .iter()
        .filter(|m| m.has_marker(marker))
        .find_map(|m| introspector.marker_value(m, marker))
}

// =============================================================================
// Static introspector
// =============================================================================

/// A member of a [`StaticIntrospector`] together with its marker payloads.
#[derive(Clone, Debug)]
pub struct StaticMember {
    member: BackingMember,
    values: BTreeMap<String, Value>,
}

impl StaticMember {
    /// Creates a member without markers.
    #[must_use]
    pub fn new(
        owner: impl Into<NodeRef>,
        name: impl Into<String>,
        kind: MemberKind,
        declared_type: SemanticType,
    ) -> Self {
        Self {
            member: BackingMember {
                owner: owner.into(),
                name: name.into(),
                declared_type,
                markers: BTreeSet::new(),
                kind,
            },
            values: BTreeMap::new(),
        }
    }

    /// Creates the element implementing `owner`.
    #[must_use]
    pub fn element(owner: impl Into<NodeRef>, kind: MemberKind) -> Self {
        Self::new(owner, "", kind, SemanticType::Any)
    }

    /// Adds a marker without payload.
    #[must_use]
    pub fn marker(self, marker: impl Into<String>) -> Self {
        self.marker_value(marker, Value::Nil)
    }

    /// Adds a marker with a payload.
    #[must_use]
    pub fn marker_value(mut self, marker: impl Into<String>, value: impl Into<Value>) -> Self {
        let marker = marker.into();
        self.member.markers.insert(marker.clone());
        self.values.insert(marker, value.into());
        self
    }
}

/// An in-memory [`Introspector`].
#[derive(Clone, Debug, Default)]
pub struct StaticIntrospector {
    members: HashMap<NodeRef, Vec<StaticMember>>,
}

impl StaticIntrospector {
    /// Creates an introspector with no members.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member.
    pub fn add(&mut self, member: StaticMember) -> &mut Self {
        self.members.entry(member.member.owner).or_default().push(member);
        self
    }

    /// Builder method to add a member.
    #[must_use]
    pub fn with(mut self, member: StaticMember) -> Self {
        self.add(member);
        self
    }
}

impl Introspector for StaticIntrospector {
    fn backing_members(&self, node: NodeRef) -> Vec<BackingMember> {
        let mut members: Vec<_> = self
            .members
            .get(&node)
            .map(|ms| ms.iter().map(|m| m.member.clone()).collect())
            .unwrap_or_default();
        members.sort_by_key(|m| !m.kind.is_element());
        members
    }

    fn marker_value(&self, member: &BackingMember, marker: &str) -> Option<Value> {
        self.members
            .get(&member.owner)?
            .iter()
            .find(|m| m.member.name == member.name && m.member.kind == member.kind)?
            .values
            .get(marker)
            .cloned()
    }
}
