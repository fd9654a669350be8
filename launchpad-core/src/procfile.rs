//! Process declaration file.

/// File name of the process declaration artifact.
pub const PROCFILE_NAME: &str = "Procfile";

const WEB: &str = "web: bundle exec unicorn -p $PORT -c ./config/unicorn.rb";
const WORKER: &str = "worker: bundle exec sidekiq -C ./config/sidekiq.yml";

/// Render the `web` and `worker` declarations. The worker line is commented
/// out unless workers are enabled.
pub fn render_procfile(workers_enabled: bool) -> String {
    let worker = if workers_enabled {
        WORKER.to_owned()
    } else {
        format!("# {WORKER}")
    };
    format!("{WEB}\n{worker}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_line_active_when_enabled() {
        let content = render_procfile(true);
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("web: "));
        assert!(lines[1].starts_with("worker: "));
    }

    #[test]
    fn worker_line_commented_when_disabled() {
        let content = render_procfile(false);
        assert!(content.lines().nth(1).unwrap().starts_with("# worker: "));
    }
}
