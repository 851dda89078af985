/// Which screen the terminal presenter is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Start,
    Quiz,
    Result,
}
