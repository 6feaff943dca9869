//=========================================================================
// Shader Table
//=========================================================================
//
// Named shader sources threaded to every world. The text is opaque here;
// only the renderer compiles it.
//
//=========================================================================

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShaderTable {
    shaders: HashMap<String, ShaderSource>,
}

impl ShaderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a shader, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, source: ShaderSource) -> Option<ShaderSource> {
        self.shaders.insert(name.into(), source)
    }

    pub fn with(mut self, name: impl Into<String>, source: ShaderSource) -> Self {
        self.insert(name, source);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ShaderSource> {
        self.shaders.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shaders.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }
}
