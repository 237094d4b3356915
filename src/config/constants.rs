// * Configuration Constants
// * Central location for all configurable thresholds and timeouts

// * Search page navigation timeout in milliseconds
pub const SEARCH_NAV_TIMEOUT_MS: u64 = 90_000;

// * Wait for the paginator "next" control to reappear after a click
pub const NEXT_CONTROL_TIMEOUT_MS: u64 = 120_000;

// * Wait for a full navigation event after a scripted click
pub const NAVIGATION_TIMEOUT_MS: u64 = 30_000;

// * Wait for the search input box on script-driven search pages
pub const SEARCH_BOX_TIMEOUT_MS: u64 = 10_000;

// * Settle delay after a paginator click, lets client-rendered results finish
pub const PAGE_SETTLE_MS: u64 = 3_000;

// * Settle delay after submitting a search form
pub const SEARCH_SETTLE_MS: u64 = 2_000;

// * Polling interval for bounded selector waits
pub const SELECTOR_POLL_MS: u64 = 250;

// * Results per listing page on El Universal's search
pub const EL_UNIVERSAL_PAGE_SIZE: usize = 20;

// * Results per listing page on Milenio's search
pub const MILENIO_PAGE_SIZE: usize = 10;

// * Articles published before this year are dropped at the adapter boundary
pub const RETENTION_CUTOFF_YEAR: i32 = 2016;
