mod output;

pub use output::{
    display_banner, display_budget_exhausted, display_error, display_final_response,
    display_partial_output, display_query_header, display_query_summary, preview,
};
