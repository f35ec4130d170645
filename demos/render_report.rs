//! Render a job result from the analysis service into a PDF.
//!
//! ```text
//! cargo run --example render-report -- demos/sample_job.json [config.json] [out-dir]
//! ```

use stride_report::report::{JobResult, ReportConfig, ReportRenderer};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let job_path = args
        .next()
        .unwrap_or_else(|| "demos/sample_job.json".to_string());
    let config = match args.next() {
        Some(path) => {
            let config = std::fs::read_to_string(&path).expect("can read config");
            serde_json::from_str::<ReportConfig>(&config).expect("valid config")
        }
        None => ReportConfig::default(),
    };
    let out_dir = args.next().unwrap_or_else(|| "target".to_string());

    let job = std::fs::read_to_string(&job_path).expect("can read job result");
    let model = JobResult::from_json(&job)
        .and_then(JobResult::into_report)
        .expect("job has a report");

    let rendered = ReportRenderer::new(config)
        .render(&model)
        .expect("can render report");
    let path = rendered.save_in(&out_dir).expect("can save report");
    println!("wrote {} pages to {}", rendered.page_count, path.display());
}
