//! Notification vocabulary and the components firing it.

use extmodel_declaration::{Declaration, DeclarationKind, NodeRef, NotificationModel};
use extmodel_foundation::{Error, Result, Value};

use super::{components, payload_items};
use crate::context::EnrichmentContext;
use crate::introspection::{element_marker, markers, members_with_marker};
use crate::pipeline::DeclarationEnricher;
use crate::properties::NotificationEmitterProperty;

/// Registers the extension's notifications and resolves what each operation
/// and source fires.
#[derive(Copy, Clone, Debug, Default)]
pub struct NotificationsEnricher;

fn parse_action(namespace: &str, item: &Value) -> Result<NotificationModel> {
    let (identifier, data_type) = match item.as_str() {
        Some(name) => (name, "any"),
        None => {
            let name = item.get_str("name").ok_or_else(|| {
                Error::invalid_marker_payload(
                    markers::NOTIFICATION_ACTIONS,
                    format!("expected a name or a map with 'name', got {}", item.type_name()),
                )
            })?;
            (name, item.get_str("type").unwrap_or("any"))
        }
    };
    Ok(NotificationModel {
        namespace: namespace.to_string(),
        identifier: identifier.to_string(),
        data_type: data_type.to_string(),
    })
}

impl DeclarationEnricher for NotificationsEnricher {
    fn name(&self) -> &str {
        "notifications"
    }

    fn enrich(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let introspector = ctx.introspector();
        let namespace = ctx.tree().extension().namespace();

        let mut actions = Vec::new();
        for member in
            members_with_marker(introspector, NodeRef::Extension, markers::NOTIFICATION_ACTIONS)
        {
            if let Some(payload) = introspector.marker_value(&member, markers::NOTIFICATION_ACTIONS) {
                for item in payload_items(&payload) {
                    actions.push(parse_action(&namespace, &item)?);
                }
            }
        }
        ctx.tree_mut()
            .extension_mut()
            .notification_models
            .extend(actions);

        let emitters = components(
            ctx.tree_mut(),
            &[DeclarationKind::Operation, DeclarationKind::Source],
        )?;
        for id in emitters {
            let Some(fires) = element_marker(introspector, id.into(), markers::FIRES) else {
                continue;
            };
            let component = ctx.tree().get(id)?.name().to_string();
            let mut fired = Vec::new();
            for item in payload_items(&fires) {
                let name = item.as_str().ok_or_else(|| {
                    Error::invalid_marker_payload(
                        markers::FIRES,
                        format!("expected a notification name, got {}", item.type_name()),
                    )
                })?;
                let model = ctx.tree().extension().notification(name).ok_or_else(|| {
                    Error::illegal_model(format!(
                        "component '{component}' fires undeclared notification '{name}'"
                    ))
                })?;
                fired.push(model.qualified_name());
            }

            let tree = ctx.tree_mut();
            let notifications = match tree.get_mut(id)? {
                Declaration::Operation(op) => &mut op.notifications,
                Declaration::Source(source) => &mut source.notifications,
                _ => continue,
            };
            notifications.clone_from(&fired);
            tree.add_property(
                id.into(),
                NotificationEmitterProperty {
                    notifications: fired,
                },
            )?;
        }
        Ok(())
    }
}
