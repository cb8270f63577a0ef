pub mod case_lookup;
pub mod cause_list;
pub mod cause_list_render;
pub mod court_scraper;
