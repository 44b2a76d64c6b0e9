/// Which screen the user is on. One value replaces the independent
/// selected / registered / logged-in flags so that impossible combinations
/// cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    SelectingCompanion,
    AwaitingAuth,
    Chatting,
}

#[derive(Debug, Clone, Default)]
pub struct ScreenFlow {
    screen: Screen,
}

impl ScreenFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_chatting(&self) -> bool {
        self.screen == Screen::Chatting
    }

    /// A companion was picked (from the selection cards or the chat switcher).
    pub fn companion_chosen(&mut self, logged_in: bool) {
        self.screen = if logged_in {
            Screen::Chatting
        } else {
            Screen::AwaitingAuth
        };
    }

    pub fn login_requested(&mut self) {
        self.screen = Screen::AwaitingAuth;
    }

    pub fn authenticated(&mut self) {
        if self.screen == Screen::AwaitingAuth {
            self.screen = Screen::Chatting;
        }
    }

    pub fn home(&mut self) {
        self.screen = Screen::SelectingCompanion;
    }

    pub fn logged_out(&mut self) {
        self.screen = Screen::SelectingCompanion;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_companion_selection() {
        assert_eq!(ScreenFlow::new().screen(), Screen::SelectingCompanion);
    }

    #[test]
    fn choosing_companion_depends_on_login() {
        let mut flow = ScreenFlow::new();
        flow.companion_chosen(false);
        assert_eq!(flow.screen(), Screen::AwaitingAuth);

        let mut flow = ScreenFlow::new();
        flow.companion_chosen(true);
        assert_eq!(flow.screen(), Screen::Chatting);
    }

    #[test]
    fn authentication_only_advances_from_auth_screen() {
        let mut flow = ScreenFlow::new();
        flow.authenticated();
        assert_eq!(flow.screen(), Screen::SelectingCompanion);

        flow.login_requested();
        flow.authenticated();
        assert!(flow.is_chatting());
    }

    #[test]
    fn home_and_logout_return_to_selection() {
        let mut flow = ScreenFlow::new();
        flow.companion_chosen(true);
        flow.home();
        assert_eq!(flow.screen(), Screen::SelectingCompanion);

        flow.companion_chosen(true);
        flow.logged_out();
        assert_eq!(flow.screen(), Screen::SelectingCompanion);
    }
}
