/// Page navigation, used to send the user to the login page after a 401.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// Navigator for hosts without pages; the redirect is only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, path: &str) {
        tracing::debug!(path, "navigation requested without a page host");
    }
}
