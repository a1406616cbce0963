use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use entities_cli::config::CompileConfig;
use entities_cli::pipeline::{CompileError, CompileInputs, render_output, run_pipeline};
use entities_core::OutputDocument;
use entities_ingest::load_vocabularies;
use entities_model::{SourceKind, VocabularyField};
use entities_thumbs::{DiscardThumbnails, ThumbnailMaterializer, ThumbnailQueue, ThumbnailSink};

use crate::cli::{CompileArgs, VocabularyArgs};
use crate::summary::apply_table_style;
use crate::types::{CompileResult, KindSummary};

pub fn run_vocabulary(args: &VocabularyArgs) -> Result<()> {
    let mut config = base_config(args.config.as_deref())?;
    if let Some(dir) = &args.entities_dir {
        config.entities_dir.clone_from(dir);
    }
    if let Some(path) = &args.vocabulary {
        config.vocabulary = Some(path.clone());
    }
    let path = config.vocabulary_path();
    let vocabularies = load_vocabularies(&path)
        .with_context(|| format!("load vocabulary {}", path.display()))?;

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value", "Description"]);
    apply_table_style(&mut table);
    for field in VocabularyField::ALL {
        for (value, description) in vocabularies.get(field).terms() {
            table.add_row(vec![field.record_key(), value, description]);
        }
    }
    println!("{table}");
    Ok(())
}

pub fn run_compile(args: &CompileArgs) -> Result<CompileResult> {
    let config = resolve_config(args)?;
    let compile_span = info_span!("compile", output = %config.output.display());
    let _compile_guard = compile_span.enter();
    let inputs = compile_inputs(&config);

    let queue = if config.thumbnails.enabled && !args.dry_run {
        let materializer =
            ThumbnailMaterializer::with_programs(&config.resource_dir, config.thumbnails.programs())
                .context("set up thumbnail rendering")?;
        Some(ThumbnailQueue::start(
            materializer,
            config.thumbnails.workers,
        ))
    } else {
        None
    };
    let sink: &dyn ThumbnailSink = match &queue {
        Some(queue) => queue,
        None => &DiscardThumbnails,
    };

    let mut result = CompileResult {
        dry_run: args.dry_run,
        ..CompileResult::default()
    };
    let finished = match run_pipeline(&inputs, sink) {
        Ok(document) => {
            result.kinds = kind_summaries(&document);
            if args.dry_run {
                Ok(())
            } else {
                write_output(&document, &config.output, config.pretty).map(|()| {
                    result.output = Some(config.output.clone());
                })
            }
        }
        Err(CompileError::Validation(errors)) => {
            result.errors = errors;
            Ok(())
        }
        Err(error) => Err(anyhow::Error::new(error).context("compile entities")),
    };

    // The document is on disk before thumbnails are waited for.
    result.thumbnails = queue.map(ThumbnailQueue::join);
    finished?;
    Ok(result)
}

/// Defaults, then the config file, then the environment, then flags.
fn resolve_config(args: &CompileArgs) -> Result<CompileConfig> {
    let mut config = base_config(args.config.as_deref())?;
    if let Some(dir) = &args.entities_dir {
        config.entities_dir.clone_from(dir);
    }
    if !args.combined.is_empty() {
        config.combined.clone_from(&args.combined);
    }
    if let Some(path) = &args.vocabulary {
        config.vocabulary = Some(path.clone());
    }
    if let Some(path) = &args.output {
        config.output.clone_from(path);
    }
    if let Some(dir) = &args.resource_dir {
        config.resource_dir.clone_from(dir);
    }
    if args.no_thumbnails {
        config.thumbnails.enabled = false;
    }
    if let Some(workers) = args.thumbnail_workers {
        config.thumbnails.workers = workers;
    }
    if args.pretty {
        config.pretty = true;
    }
    Ok(config)
}

fn base_config(path: Option<&Path>) -> Result<CompileConfig> {
    let mut config = match path {
        Some(path) => CompileConfig::load(path)?,
        None => CompileConfig::default(),
    };
    config.apply_env(|name| std::env::var(name).ok());
    Ok(config)
}

/// The entity tree is scanned when it exists, or when there is nothing
/// else to read.
fn compile_inputs(config: &CompileConfig) -> CompileInputs {
    let scan_tree = config.combined.is_empty() || config.entities_dir.is_dir();
    CompileInputs {
        entities_dir: scan_tree.then(|| config.entities_dir.clone()),
        combined: config.combined.clone(),
        vocabulary: config.vocabulary_path(),
    }
}

fn kind_summaries(document: &OutputDocument) -> Vec<KindSummary> {
    SourceKind::ALL
        .into_iter()
        .map(|kind| KindSummary {
            kind,
            records: document.records(kind).len(),
        })
        .collect()
}

fn write_output(document: &OutputDocument, path: &Path, pretty: bool) -> Result<()> {
    let text = render_output(document, pretty).context("render output")?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
    info!(
        path = %path.display(),
        records = document.record_count(),
        "output written"
    );
    Ok(())
}
