//! Declaration tree, model properties, and the declaration walker.
//!
//! This crate provides:
//! - [`DeclarationTree`] - Arena holding the extension and every node reachable from it
//! - [`Declaration`] - Tagged variant over every node kind
//! - [`ModelProperties`] - Per-node typed attribute store keyed by property kind
//! - [`DeclarationWalker`] - Single-visit traversal dispatching to a [`DeclarationVisitor`]
//! - [`StereotypeModel`] - Namespaced component classification

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod declaration;
pub mod extension;
pub mod node;
pub mod property;
pub mod stereotype;
pub mod tree;
pub mod types;
pub mod walker;

pub use declaration::{
    ConfigurationDeclaration, ConnectionManagement, ConnectionProviderDeclaration,
    ConstructDeclaration, Declaration, FunctionDeclaration, OperationDeclaration,
    ParameterDeclaration, ParameterGroupDeclaration, SourceCallbackDeclaration, SourceDeclaration,
};
pub use extension::{ExtensionDeclaration, NotificationModel, XmlDslModel};
pub use node::{BaseDeclaration, CallbackKind, DeclarationKind, NodeId, NodeRef, Owner};
pub use property::{ModelProperties, ModelProperty};
pub use stereotype::StereotypeModel;
pub use tree::{DEFAULT_GROUP_NAME, DeclarationTree};
pub use types::{DisplayModel, ExpressionSupport, LayoutModel, ParameterRole, SemanticType};
pub use walker::{DeclarationVisitor, DeclarationWalker, Walk};
