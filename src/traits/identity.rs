/// Anything that can render a stable textual identity.
///
/// Graph nodes are addressed by this identity in error messages and edge
/// rendering, and the engine uses it to reject duplicate actors.
pub trait Identity {
    fn identity(&self) -> String;
}

impl Identity for String {
    fn identity(&self) -> String {
        self.clone()
    }
}

impl Identity for &str {
    fn identity(&self) -> String {
        (*self).to_string()
    }
}
