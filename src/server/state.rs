use crate::search::SearchService;

pub struct AppState {
    pub search: SearchService,
}
