//! Orchestration: crawl a site, extract business facts, assemble and export
//! the knowledge base.

mod aggregate;
mod assemble;
mod export;
mod pipeline;

pub use aggregate::{aggregate, contact_score};
pub use assemble::assemble;
pub use export::{knowledge_base_to_plain_text, write_json_file, write_text_file};
pub use pipeline::{
    BuildResult, ProgressReporter, SilentProgress, build_knowledge_base, crawl_site,
};
