#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status_text: String,
    pub selected_file: Option<String>,
    pub uploads_in_flight: usize,
    pub stale_replies: usize,
    pub dirty: bool,
}
