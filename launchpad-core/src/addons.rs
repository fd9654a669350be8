//! Add-on selection.
//!
//! Pure functions over two fixed sets; order is insertion order and only
//! matters for display.

use crate::types::AddonId;

/// Add-ons attached to every app.
pub const DEFAULT_ADDONS: [&str; 4] = ["mongolab", "logentries", "newrelic", "mandrill"];

/// Add-ons attached only when every add-on is requested.
pub const OPTIONAL_ADDONS: [&str; 2] = ["openredis", "exceptional"];

/// The cache add-on whose URL feeds the worker queue.
pub const CACHE_ADDON: &str = "openredis";

/// Add-ons to install during provisioning.
///
/// The explicit list is not consulted here; it only drives
/// [`effective_optional_addons`].
pub fn select_addons(request_all: bool, _explicit: &[AddonId]) -> Vec<AddonId> {
    let mut selected: Vec<AddonId> = DEFAULT_ADDONS.iter().map(|a| AddonId::from(*a)).collect();
    if request_all {
        for addon in OPTIONAL_ADDONS {
            let id = AddonId::from(addon);
            if !selected.contains(&id) {
                selected.push(id);
            }
        }
    }
    selected
}

/// Optional add-ons installable on their own, outside the "all" path.
pub fn effective_optional_addons(explicit: &[AddonId]) -> Vec<AddonId> {
    if explicit.is_empty() {
        OPTIONAL_ADDONS.iter().map(|a| AddonId::from(*a)).collect()
    } else {
        explicit.to_vec()
    }
}

/// Whether `addons` contains the cache add-on.
pub fn includes_cache(addons: &[AddonId]) -> bool {
    addons.iter().any(|a| a.as_str() == CACHE_ADDON)
}
