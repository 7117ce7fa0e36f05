// Licensed under the Apache-2.0 license

//! Job descriptions and the interpreter that runs them.
//!
//! A job is a named list of [`Step`]s. Jobs come from TOML manifests:
//!
//! ```toml
//! [[job]]
//! name = "control block"
//!
//! [[job.step]]
//! op = "add-register"
//! name = "ctrl"
//! comment = "control"
//!
//! [[job.step]]
//! op = "emit-glue"
//! output = "ctrl_glue.v"
//! ```
//!
//! or from blocks embedded in any other source file, whose body holds the
//! same steps as top level `[[step]]` tables:
//!
//! ```text
//! /*@@job:control block
//! [[step]]
//! op = "add-register"
//! name = "ctrl"
//! @@end-job*/
//! ```

use crate::files::{resolve_template, write_generated_files, GeneratedFile};
use crate::symbols::SymbolTable;
use anyhow::{bail, Context, Result};
use log::{debug, error, info};
use regbank_generator::{
    generate_c_header, generate_glue, GlueConfig, GlueError, HeaderConfig, RegisterBank,
    RegisterMode, ResetPolicy,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Symbol selecting [`ResetPolicy::Offset`] for glue emitted while defined.
pub const AXI_DEBUG_SYMBOL: &str = "AXI_DEBUG";

const JOB_BLOCK_START: &str = "/*@@job:";
const JOB_BLOCK_END: &str = "@@end-job*/";

/// One instruction of a job.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum Step {
    /// Discard the registers added so far and rewind the offset cursor.
    Start,
    /// Place the next register at `offset`.
    SetOffset { offset: i64 },
    /// Add a register at the cursor. Mode defaults to passive.
    AddRegister {
        name: String,
        #[serde(default)]
        mode: Option<String>,
        #[serde(default)]
        comment: String,
    },
    /// Write the Verilog glue for the current bank.
    EmitGlue {
        output: String,
        #[serde(default)]
        template: Option<String>,
    },
    /// Write the C structure for the current bank.
    EmitHeader { output: String, struct_name: String },
    /// Define a symbol, with value 1 unless given.
    Define {
        symbol: String,
        #[serde(default)]
        value: Option<toml::Value>,
    },
    EmitDefinesVerilog { output: String },
    EmitDefinesC { output: String },
}

impl Step {
    /// Every instruction as `(op, description)`.
    pub const OPS: &'static [(&'static str, &'static str)] = &[
        ("start", "start a new register bank"),
        ("set-offset", "set the byte offset of the next register (offset)"),
        (
            "add-register",
            "add a register at the cursor, advancing it by 4 (name, mode?, comment?)",
        ),
        (
            "emit-glue",
            "write AXI4-Lite glue for the bank (output, template?)",
        ),
        ("emit-header", "write a C structure for the bank (output, struct-name)"),
        ("define", "define a symbol (symbol, value?)"),
        ("emit-defines-verilog", "write all symbols as `define lines (output)"),
        ("emit-defines-c", "write all symbols as #define lines (output)"),
    ];

    pub fn op(&self) -> &'static str {
        match self {
            Step::Start => "start",
            Step::SetOffset { .. } => "set-offset",
            Step::AddRegister { .. } => "add-register",
            Step::EmitGlue { .. } => "emit-glue",
            Step::EmitHeader { .. } => "emit-header",
            Step::Define { .. } => "define",
            Step::EmitDefinesVerilog { .. } => "emit-defines-verilog",
            Step::EmitDefinesC { .. } => "emit-defines-c",
        }
    }
}

/// A named list of steps.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

/// A TOML file holding `[[job]]` tables.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Manifest {
    #[serde(rename = "job", default)]
    pub jobs: Vec<Job>,
}

impl Manifest {
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid job manifest")
    }
}

/// Body of an embedded job block.
#[derive(Deserialize)]
struct StepList {
    #[serde(rename = "step", default)]
    steps: Vec<Step>,
}

/// Find the embedded job blocks of `text`, in order, as `(name, body)`.
///
/// A block opens with a line starting with `/*@@job:` followed by the job
/// name and closes with a line starting with `@@end-job*/`.
pub fn extract_job_blocks(text: &str) -> Result<Vec<(String, String)>> {
    let mut blocks = Vec::new();
    let mut current: Option<(String, String, usize)> = None;

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim_end();
        let Some((_, body, _)) = current.as_mut() else {
            if let Some(name) = line.strip_prefix(JOB_BLOCK_START) {
                let name = name.trim();
                debug!("found job '{name}' at line {}", line_num + 1);
                current = Some((name.to_string(), String::new(), line_num + 1));
            }
            continue;
        };

        if !line.starts_with(JOB_BLOCK_END) {
            body.push_str(line);
            body.push('\n');
            continue;
        }
        if let Some((name, body, _)) = current.take() {
            blocks.push((name, body));
        }
    }

    if let Some((name, _, start)) = current {
        bail!("job '{name}' starting at line {start} has no closing {JOB_BLOCK_END}");
    }
    Ok(blocks)
}

/// Parse the embedded jobs of a source file.
pub fn parse_embedded_jobs(text: &str) -> Result<Vec<Job>> {
    extract_job_blocks(text)?
        .into_iter()
        .map(|(name, body)| {
            let list: StepList = toml::from_str(&body)
                .with_context(|| format!("invalid steps in job '{name}'"))?;
            Ok(Job {
                name,
                steps: list.steps,
            })
        })
        .collect()
}

/// Load the jobs of `path`: a manifest if it has a `.toml` extension,
/// otherwise a source file scanned for embedded job blocks.
pub fn load_jobs(path: &Path) -> Result<Vec<Job>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_manifest = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let jobs = if is_manifest {
        Manifest::parse(&text)?.jobs
    } else {
        parse_embedded_jobs(&text)?
    };
    Ok(jobs)
}

/// Where jobs look for templates and write their outputs.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Directory every output is written to.
    pub gen_dir: PathBuf,
    /// Extra directories searched for templates, after the job's own
    /// directory and the working directory.
    pub template_dirs: Vec<PathBuf>,
}

/// Per-job state: a fresh bank, a scratch copy of the symbols and the
/// outputs produced so far.
struct JobState<'a> {
    options: &'a RunOptions,
    source_dir: Option<&'a Path>,
    bank: RegisterBank,
    symbols: SymbolTable,
    outputs: Vec<GeneratedFile>,
}

impl JobState<'_> {
    fn execute(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Start => self.bank.start(),
            Step::SetOffset { offset } => {
                let offset = u32::try_from(*offset)
                    .map_err(|_| GlueError::InvalidOffset { offset: *offset })?;
                self.bank.set_offset_cursor(offset)?;
            }
            Step::AddRegister {
                name,
                mode,
                comment,
            } => {
                let mode = match mode {
                    Some(mode) => mode.parse::<RegisterMode>()?,
                    None => RegisterMode::default(),
                };
                self.bank.add_register(name, mode, comment)?;
            }
            Step::EmitGlue { output, template } => {
                let template = resolve_template(
                    template.as_deref(),
                    self.source_dir,
                    &self.options.template_dirs,
                )?;
                let reset_policy = if self.symbols.is_defined(AXI_DEBUG_SYMBOL) {
                    ResetPolicy::Offset
                } else {
                    ResetPolicy::Zero
                };
                let config = GlueConfig::new().reset_policy(reset_policy);
                let contents = generate_glue(&self.bank, &template, &config)?;
                self.push_output(output, contents);
            }
            Step::EmitHeader {
                output,
                struct_name,
            } => {
                let contents = generate_c_header(&self.bank, struct_name, &HeaderConfig::new())?;
                self.push_output(output, contents);
            }
            Step::Define { symbol, value } => match value {
                Some(toml::Value::String(s)) => self.symbols.define_value(symbol, s),
                Some(other) => self.symbols.define_value(symbol, &other.to_string()),
                None => self.symbols.define(symbol),
            },
            Step::EmitDefinesVerilog { output } => {
                let contents = self.symbols.verilog_defines();
                self.push_output(output, contents);
            }
            Step::EmitDefinesC { output } => {
                let contents = self.symbols.c_defines();
                self.push_output(output, contents);
            }
        }
        Ok(())
    }

    fn push_output(&mut self, name: &str, contents: String) {
        self.outputs.push(GeneratedFile {
            name: name.to_string(),
            contents,
        });
    }
}

/// Runs jobs in order, tracking how many failed.
///
/// A job either completes and writes all of its outputs, or fails and
/// writes none of them; its symbol definitions are discarded along with
/// its outputs. A failing job does not stop the jobs after it, and an
/// input file that cannot be loaded does not stop the files after it.
pub struct JobRunner {
    options: RunOptions,
    symbols: SymbolTable,
    completed: usize,
    failed: usize,
    failed_files: usize,
}

impl JobRunner {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            symbols: SymbolTable::new(),
            completed: 0,
            failed: 0,
            failed_files: 0,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Symbols visible to every job, e.g. from the command line.
    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn completed_jobs(&self) -> usize {
        self.completed
    }

    pub fn failed_jobs(&self) -> usize {
        self.failed
    }

    /// Input files that could not be read or parsed.
    pub fn failed_files(&self) -> usize {
        self.failed_files
    }

    /// Run every file of `paths` in order, logging and counting the files
    /// that cannot be loaded. Returns true if every file loaded and every
    /// job completed.
    pub fn run_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> bool {
        for path in paths {
            let path = path.as_ref();
            if let Err(e) = self.run_file(path) {
                error!("{}: {e:#}", path.display());
                self.failed_files += 1;
            }
        }
        self.failed == 0 && self.failed_files == 0
    }

    /// Run every job of `path`. Symbols defined by the file's jobs are
    /// forgotten once the file is done.
    ///
    /// Errors only if the file itself cannot be read or parsed.
    pub fn run_file(&mut self, path: &Path) -> Result<()> {
        info!("processing {}", path.display());
        let jobs = load_jobs(path)?;
        let source_dir = path.parent();

        self.symbols.checkpoint();
        for job in &jobs {
            self.run_job(job, source_dir);
        }
        self.symbols.restore();
        Ok(())
    }

    /// Run one job, logging and counting its outcome. Returns true if the
    /// job completed.
    pub fn run_job(&mut self, job: &Job, source_dir: Option<&Path>) -> bool {
        info!("job '{}': processing", job.name);
        match self.try_run_job(job, source_dir) {
            Ok(()) => {
                info!("job '{}': completed", job.name);
                self.completed += 1;
                true
            }
            Err(e) => {
                error!("job '{}': {e:#}", job.name);
                self.failed += 1;
                false
            }
        }
    }

    fn try_run_job(&mut self, job: &Job, source_dir: Option<&Path>) -> Result<()> {
        let mut state = JobState {
            options: &self.options,
            source_dir,
            bank: RegisterBank::new(),
            symbols: self.symbols.clone(),
            outputs: Vec::new(),
        };

        for (i, step) in job.steps.iter().enumerate() {
            debug!("job '{}': step {} {}", job.name, i + 1, step.op());
            state
                .execute(step)
                .with_context(|| format!("step {} ({})", i + 1, step.op()))?;
        }

        write_generated_files(&self.options.gen_dir, &state.outputs)?;
        self.symbols = state.symbols;
        Ok(())
    }
}
