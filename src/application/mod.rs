pub mod use_cases;

pub use use_cases::case_lookup::CaseLookupUseCase;
pub use use_cases::cause_list::CauseListUseCase;
pub use use_cases::court_scraper::CourtScraper;
