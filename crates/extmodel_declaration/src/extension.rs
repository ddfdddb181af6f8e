//! The extension root.

use std::collections::BTreeSet;

use extmodel_taxonomy::ErrorModel;

use crate::node::{BaseDeclaration, NodeId};
use crate::types::SemanticType;

/// XML DSL metadata of an extension.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlDslModel {
    /// Element prefix (`http`, `db`).
    pub prefix: String,
    /// Namespace URI.
    pub namespace_uri: String,
}

/// A notification the extension can fire.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationModel {
    /// Upper-cased extension namespace.
    pub namespace: String,
    /// Notification name.
    pub identifier: String,
    /// Type of the notification payload.
    pub data_type: String,
}

impl NotificationModel {
    /// Returns the `NAMESPACE:IDENTIFIER` form.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.namespace, self.identifier)
    }
}

/// Root of a declaration tree.
#[derive(Debug, Default)]
pub struct ExtensionDeclaration {
    /// Shared node state.
    pub base: BaseDeclaration,
    /// Vendor.
    pub vendor: String,
    /// Version.
    pub version: String,
    /// XML DSL metadata.
    pub xml_dsl: XmlDslModel,
    /// Configurations.
    pub configurations: Vec<NodeId>,
    /// Connection providers declared at the top level.
    pub connection_providers: Vec<NodeId>,
    /// Sources declared at the top level.
    pub sources: Vec<NodeId>,
    /// Operations declared at the top level.
    pub operations: Vec<NodeId>,
    /// Functions declared at the top level.
    pub functions: Vec<NodeId>,
    /// Constructs.
    pub constructs: Vec<NodeId>,
    /// Every error model the extension defines or inherits.
    pub error_models: BTreeSet<ErrorModel>,
    /// Notifications the extension can fire.
    pub notification_models: BTreeSet<NotificationModel>,
    /// Types the extension declares.
    pub types: Vec<SemanticType>,
    /// Names of types imported from other extensions.
    pub imported_types: BTreeSet<String>,
    /// Names of types exported to other extensions.
    pub exported_types: BTreeSet<String>,
}

impl ExtensionDeclaration {
    /// Creates an extension with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseDeclaration::new(name),
            ..Self::default()
        }
    }

    /// Sets the XML DSL prefix and namespace URI.
    #[must_use]
    pub fn with_xml_dsl(mut self, prefix: impl Into<String>, namespace_uri: impl Into<String>) -> Self {
        self.xml_dsl = XmlDslModel {
            prefix: prefix.into(),
            namespace_uri: namespace_uri.into(),
        };
        self
    }

    /// Sets the vendor and version.
    #[must_use]
    pub fn with_vendor(mut self, vendor: impl Into<String>, version: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self.version = version.into();
        self
    }

    /// Returns the namespace of the models this extension defines.
    ///
    /// The upper-cased DSL prefix, or the upper-cased name when no prefix is set.
    #[must_use]
    pub fn namespace(&self) -> String {
        if self.xml_dsl.prefix.is_empty() {
            self.base.name.to_uppercase()
        } else {
            self.xml_dsl.prefix.to_uppercase()
        }
    }

    /// Returns the notification with the given identifier.
    #[must_use]
    pub fn notification(&self, identifier: &str) -> Option<&NotificationModel> {
        self.notification_models.iter().find(|n| n.identifier == identifier)
    }
}
