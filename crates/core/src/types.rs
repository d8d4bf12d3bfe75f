use std::collections::BTreeMap;

/// Registry host identifier, e.g. `registry.example.com:5000`.
pub type Registry = String;

/// Source image reference → target image reference.
pub type ImageMapping = BTreeMap<String, String>;
