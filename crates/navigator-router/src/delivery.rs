//! Data delivery along navigation
//!
//! Thin wrappers over the optional [`DataReceiver`](navigator_core::DataReceiver)
//! capability. Content without the capability is skipped silently; every
//! delivery is logged either way.

use navigator_core::{DataModel, Payload, SceneRef};
use tracing::debug;

/// Deliver a request to the scene about to become visible
pub(crate) fn before_show(scene: &SceneRef, data: &DataModel, from: Option<&SceneRef>) {
    debug!(
        to = scene.identifier(),
        from = ?from.map(|s| s.identifier()),
        request = data.identifier(),
        "Sending data before show"
    );
    if let Some(receiver) = scene.data_receiver() {
        receiver.before_show(data, from);
    }
}

/// Deliver a back payload to the scene about to become top again
pub(crate) fn before_back(scene: &SceneRef, data: &Payload, from: Option<&SceneRef>) {
    debug!(
        to = scene.identifier(),
        from = ?from.map(|s| s.identifier()),
        payload = ?data,
        "Sending data before back"
    );
    if let Some(receiver) = scene.data_receiver() {
        receiver.before_back(data, from);
    }
}

/// Deliver a back payload to the new top once the dismissal committed
pub(crate) fn after_back(scene: &SceneRef, data: &Payload) {
    debug!(to = scene.identifier(), payload = ?data, "Sending data after back");
    if let Some(receiver) = scene.data_receiver() {
        receiver.after_back(data);
    }
}
