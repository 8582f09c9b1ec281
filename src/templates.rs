use std::path::Path;
use std::sync::OnceLock;
use tera::Tera;

static TERA: OnceLock<Tera> = OnceLock::new();

fn load(template_dir: &Path) -> Tera {
    let pattern = format!("{}/**/*.html", template_dir.display());
    match Tera::new(&pattern) {
        Ok(tera) => tera,
        Err(e) => {
            tracing::error!("Failed to load templates from {}: {}", template_dir.display(), e);
            Tera::default()
        }
    }
}

/// Load templates from `template_dir` on first use. Later calls return the
/// already-loaded set regardless of the directory passed.
pub fn get_tera(template_dir: &Path) -> &'static Tera {
    TERA.get_or_init(|| load(template_dir))
}
