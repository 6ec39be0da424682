/// State of the third-party challenge widget, driven entirely by its
/// callbacks and by explicit resets after a successful submission.
#[derive(Clone, Debug, PartialEq)]
pub enum CaptchaState {
    Unrendered,
    Pending,
    Valid(String),
    Expired,
    Failed,
}

/// One discrete external event, each mapped to exactly one transition.
#[derive(Clone, Debug, PartialEq)]
pub enum CaptchaEvent {
    /// The widget script rendered the challenge into the page.
    Rendered,
    /// The widget's success callback delivered a token.
    TokenReceived(String),
    /// The widget's error callback fired.
    Errored,
    /// The widget's expiry callback fired; the token is gone.
    Expired,
    /// Retry after an error, or forced re-render after a successful
    /// submission. Clears the render guard so the widget renders afresh.
    Reset,
}

pub struct CaptchaWidget {
    state: CaptchaState,
    // Guards against rendering the widget twice into the same container.
    rendered: bool,
}

impl Default for CaptchaWidget {
    fn default() -> Self {
        CaptchaWidget {
            state: CaptchaState::Unrendered,
            rendered: false,
        }
    }
}

impl CaptchaWidget {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn state(&self) -> &CaptchaState {
        &self.state
    }

    /// The token to attach to a submission; present only while the widget
    /// reports a completed, unexpired challenge.
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            CaptchaState::Valid(token) => Some(token),
            _ => None,
        }
    }

    /// True when the embedding page should (re)render the widget.
    pub fn needs_render(&self) -> bool {
        !self.rendered
    }

    /// Applies one widget event. Callbacks arriving in states they do not
    /// apply to are ignored; the third-party script controls their timing.
    pub fn handle(&mut self, event: CaptchaEvent) {
        match event {
            CaptchaEvent::Rendered => {
                if !self.rendered {
                    self.rendered = true;
                    self.state = CaptchaState::Pending;
                }
            }
            CaptchaEvent::TokenReceived(token) => {
                if self.rendered {
                    self.state = CaptchaState::Valid(token);
                }
            }
            CaptchaEvent::Errored => {
                if self.rendered {
                    self.state = CaptchaState::Failed;
                }
            }
            CaptchaEvent::Expired => {
                if let CaptchaState::Valid(_) = self.state {
                    self.state = CaptchaState::Expired;
                }
            }
            CaptchaEvent::Reset => {
                self.rendered = false;
                self.state = CaptchaState::Unrendered;
            }
        }
    }
}
