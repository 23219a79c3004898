//! The interactive shell.
//!
//! [`Shell`] reads one command per line from any [`AsyncBufRead`] and writes
//! to any [`Write`], so the same loop serves a terminal and in-memory test
//! buffers.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::error::ErrorKind;
use clap::Parser;
use std::collections::HashMap;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::commands::{ShellCommand, ShellLine};
use crate::app::App;
use crate::chart::{to_dot, GanttChart};
use crate::config::ShellConfig;
use crate::domain::{parse_target_date, Product, ProductId};
use crate::error::Error;
use crate::graph::Prerequisite;
use crate::output::{self, OutputConfig};

/// Greeting printed when the shell starts
pub const INTRO: &str = "Welcome to the LabDAG Shell. Type help or ? to list commands.";

/// Minimum number of hex digits accepted as an id prefix
const MIN_ID_PREFIX_LEN: usize = 8;

/// What the shell loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command
    Continue,
    /// Leave the shell
    Exit,
}

/// Interactive command loop over a product graph.
pub struct Shell<R, W> {
    app: App,
    config: ShellConfig,
    output: OutputConfig,
    input: R,
    out: W,
    today: NaiveDate,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Create a shell reading commands from `input` and writing to `out`.
    pub fn new(app: App, config: ShellConfig, input: R, out: W) -> Self {
        let output = OutputConfig::from_shell_config(&config);
        Self {
            app,
            config,
            output,
            input,
            out,
            today: Local::now().date_naive(),
        }
    }

    /// Use a fixed date as "today" when parsing dates without a year.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// The application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Mutable application state.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Consume the shell, returning the application state and output sink.
    pub fn into_parts(self) -> (App, W) {
        (self.app, self.out)
    }

    /// Run until `exit`, `quit` or end of input.
    ///
    /// A failing command prints `Error: ...` and the loop continues.
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.out, "{INTRO}")?;
        tracing::debug!("Shell started");

        loop {
            write!(self.out, "{}", self.config.prompt)?;
            self.out.flush()?;

            let Some(line) = self.read_line().await? else {
                writeln!(self.out)?;
                break;
            };

            match self.execute_line(&line).await {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    let message = format!("Error: {e:#}");
                    writeln!(self.out, "{}", output::error(&message, &self.output))?;
                }
            }
        }

        writeln!(self.out, "Goodbye!")?;
        Ok(())
    }

    /// Tokenize, parse and execute one line of input.
    pub async fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let mut tokens = split_line(line)?;
        if tokens.is_empty() {
            return Ok(Flow::Continue);
        }
        if tokens[0] == "?" {
            tokens[0] = "help".to_string();
        }
        self.execute_args(tokens).await
    }

    /// Parse and execute one already-tokenized command.
    pub async fn execute_args<I, T>(&mut self, args: I) -> Result<Flow>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match ShellLine::try_parse_from(args) {
            Ok(line) => self.execute(line.command).await,
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp) => {
                write!(self.out, "{}", err.render())?;
                Ok(Flow::Continue)
            }
            Err(err) => {
                let rendered = err.render().to_string();
                let message = rendered.trim();
                Err(anyhow!(
                    "{}",
                    message.strip_prefix("error: ").unwrap_or(message)
                ))
            }
        }
    }

    /// Execute one parsed command.
    ///
    /// The application is marked changed only when a mutating command left
    /// the graph different from before, even if the command then failed.
    pub async fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        tracing::debug!(?command, "Executing shell command");

        let before = command.mutates().then(|| self.app.graph().clone());
        let flow = self.dispatch(command).await;
        if let Some(before) = before {
            if *self.app.graph() != before {
                self.app.mark_changed();
            } else {
                tracing::debug!("Command left the graph unchanged");
            }
        }
        flow
    }

    async fn dispatch(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Load { file } => {
                let path = self.app.load(file.as_deref()).await?;
                writeln!(
                    self.out,
                    "Loaded {} product(s) from {}.",
                    self.app.graph().len(),
                    path.display()
                )?;
            }
            ShellCommand::Save { file } => {
                let path = self.app.save(file.as_deref()).await?;
                writeln!(
                    self.out,
                    "Saved {} product(s) to {}.",
                    self.app.graph().len(),
                    path.display()
                )?;
            }
            ShellCommand::Show => self.show()?,
            ShellCommand::Info { product } => {
                let id = self.resolve(&product).await?;
                let graph = self.app.graph();
                let product = graph
                    .get(&id)
                    .ok_or_else(|| Error::NotFound(id.to_string()))?;
                output::print_product_details(&mut self.out, graph, product, &self.output)?;
            }
            ShellCommand::Add {
                name,
                prerequisites,
            } => self.add(name, &prerequisites).await?,
            ShellCommand::Remove { product } => {
                let id = self.resolve(&product).await?;
                let removed = self.app.graph_mut().remove_product(id)?;
                writeln!(self.out, "Removed product {}.", removed.label())?;
            }
            ShellCommand::Depends {
                product,
                prerequisites,
            } => self.depends(&product, &prerequisites).await?,
            ShellCommand::Undepend {
                product,
                prerequisites,
            } => {
                let id = self.resolve(&product).await?;
                let mut pre_ids = Vec::with_capacity(prerequisites.len());
                for reference in &prerequisites {
                    pre_ids.push(self.resolve(reference).await?);
                }
                let removed = self.app.graph_mut().remove_dependencies(id, pre_ids);
                let label = self.label(&id)?;
                writeln!(self.out, "Removed {removed} prerequisite(s) from {label}.")?;
            }
            ShellCommand::Mark { product, status } => {
                let id = self.resolve(&product).await?;
                let label = self.edit(&id, |p| p.status = status)?;
                writeln!(self.out, "Marked {label} as {status}.")?;
            }
            ShellCommand::Target { product, date } => {
                let id = self.resolve(&product).await?;
                if date.eq_ignore_ascii_case("clear") {
                    let label = self.edit(&id, |p| p.target = None)?;
                    writeln!(self.out, "Cleared target date of {label}.")?;
                } else {
                    let target = parse_target_date(&date, self.today)?;
                    let label = self.edit(&id, |p| p.target = Some(target))?;
                    writeln!(
                        self.out,
                        "Set target date of {label} to {}.",
                        target.format("%Y-%m-%d")
                    )?;
                }
            }
            ShellCommand::Note { product, text } => {
                let id = self.resolve(&product).await?;
                let label = self.edit(&id, |p| p.notes = text.join(" "))?;
                writeln!(self.out, "Updated notes of {label}.")?;
            }
            ShellCommand::Describe { product, text } => {
                let id = self.resolve(&product).await?;
                let label = self.edit(&id, |p| p.description = text.join(" "))?;
                writeln!(self.out, "Updated description of {label}.")?;
            }
            ShellCommand::Resource { product, uri } => {
                let id = self.resolve(&product).await?;
                let label = self.edit(&id, |p| p.resources.push(uri.clone()))?;
                writeln!(self.out, "Added resource {uri} to {label}.")?;
            }
            ShellCommand::Rename { product, name } => {
                let id = self.resolve(&product).await?;
                let old = self.label(&id)?;
                let label = self.edit(&id, |p| p.name = name)?;
                writeln!(self.out, "Renamed {old} to {label}.")?;
            }
            ShellCommand::Order => {
                let order = self.app.graph().order()?;
                output::print_numbered(&mut self.out, &order, &self.output)?;
            }
            ShellCommand::Endpoints => {
                let endpoints = self.app.graph().endpoints();
                output::print_numbered(&mut self.out, &endpoints, &self.output)?;
            }
            ShellCommand::Validate => {
                let report = self.app.graph().validate()?;
                output::print_validation(&mut self.out, &report, &self.output)?;
            }
            ShellCommand::Chart => {
                let chart = GanttChart::layout(self.app.graph())?;
                chart.render(&mut self.out, self.config.bar_width, &self.output)?;
            }
            ShellCommand::Dot { file } => {
                let dot = to_dot(self.app.graph());
                match file {
                    Some(path) => {
                        tokio::fs::write(&path, dot)
                            .await
                            .with_context(|| format!("writing {}", path.display()))?;
                        writeln!(self.out, "Wrote {}.", path.display())?;
                    }
                    None => write!(self.out, "{dot}")?,
                }
            }
            ShellCommand::Exit => return Ok(Flow::Exit),
        }

        Ok(Flow::Continue)
    }

    // ========== Commands ==========

    fn show(&mut self) -> Result<()> {
        let graph = self.app.graph();
        let products = match graph.order() {
            Ok(products) => products,
            Err(Error::CycleDetected { cycle }) => {
                let note = format!("Graph has a cycle ({cycle}); showing insertion order.");
                writeln!(self.out, "{}", output::warning(&note, &self.output))?;
                graph.products().collect()
            }
            Err(e) => return Err(e.into()),
        };
        output::print_product_list(&mut self.out, graph, &products, &self.output)?;
        Ok(())
    }

    async fn add(&mut self, name: String, prerequisites: &[String]) -> Result<()> {
        let mut created = HashMap::new();
        let mut resolved = Vec::with_capacity(prerequisites.len());
        for reference in prerequisites {
            resolved.push(self.resolve_or_create(reference, &mut created).await?);
        }

        let product = Product::new(name);
        let label = product.label();
        let id = product.id();
        self.app.graph_mut().add_product(product, resolved)?;

        let pres = self.app.graph().prerequisites(&id)?;
        if pres.is_empty() {
            writeln!(self.out, "Product {label} added.")?;
        } else {
            let labels: Vec<String> = pres.iter().map(|p| p.label()).collect();
            writeln!(
                self.out,
                "Product {label} added with prerequisites: {}",
                labels.join(", ")
            )?;
        }
        Ok(())
    }

    async fn depends(&mut self, product: &str, prerequisites: &[String]) -> Result<()> {
        let mut created = HashMap::new();
        let target = self.resolve_or_create(product, &mut created).await?;
        let id = target.id();

        let mut resolved = Vec::with_capacity(prerequisites.len());
        for reference in prerequisites {
            resolved.push(self.resolve_or_create(reference, &mut created).await?);
        }

        self.app.graph_mut().add_dependency(target, resolved)?;
        let label = self.label(&id)?;
        writeln!(self.out, "Added prerequisites to {label}.")?;
        Ok(())
    }

    // ========== Product references ==========

    /// Resolve a reference to an existing product.
    ///
    /// Tries a full id, then a unique id prefix or short id, then the name.
    /// Several products with the name trigger a numbered selection prompt.
    async fn resolve(&mut self, reference: &str) -> Result<ProductId> {
        if let Some(id) = self.match_id(reference) {
            return Ok(id);
        }

        let matches: Vec<ProductId> = self
            .app
            .graph()
            .products_by_name(reference)
            .iter()
            .map(|p| p.id())
            .collect();

        match matches.as_slice() {
            [] => Err(Error::NotFound(reference.to_string()).into()),
            [id] => Ok(*id),
            _ => self.select(reference, &matches).await,
        }
    }

    /// Like [`resolve`](Self::resolve), but an unknown name becomes a new
    /// product. The same unknown name within one command maps to one product.
    /// An unknown reference shaped like an id is `NotFound`, never a name.
    async fn resolve_or_create(
        &mut self,
        reference: &str,
        created: &mut HashMap<String, Product>,
    ) -> Result<Prerequisite> {
        if let Some(product) = created.get(reference) {
            return Ok(Prerequisite::New(product.clone()));
        }
        if let Some(id) = self.match_id(reference) {
            return Ok(Prerequisite::Existing(id));
        }
        if self.app.graph().products_by_name(reference).is_empty() {
            if looks_like_id(reference) {
                return Err(Error::NotFound(reference.to_string()).into());
            }
            let name = super::validators::validate_name(reference).map_err(|e| anyhow!(e))?;
            let product = Product::new(name);
            created.insert(reference.to_string(), product.clone());
            return Ok(Prerequisite::New(product));
        }
        Ok(Prerequisite::Existing(self.resolve(reference).await?))
    }

    fn match_id(&self, reference: &str) -> Option<ProductId> {
        let graph = self.app.graph();
        if let Ok(id) = reference.parse::<ProductId>() {
            return graph.contains(&id).then_some(id);
        }

        if !looks_like_id(reference) {
            return None;
        }

        let needle = reference.to_ascii_lowercase();
        let mut hits = graph
            .products()
            .map(Product::id)
            .filter(|id| id.to_string().starts_with(&needle) || id.short() == needle);
        match (hits.next(), hits.next()) {
            (Some(id), None) => Some(id),
            _ => None,
        }
    }

    async fn select(&mut self, name: &str, candidates: &[ProductId]) -> Result<ProductId> {
        writeln!(self.out, "Multiple products named {name} found:")?;
        for (i, id) in candidates.iter().enumerate() {
            let product = self
                .app
                .graph()
                .get(id)
                .ok_or_else(|| Error::NotFound(id.to_string()))?;
            writeln!(self.out, "\t{}. {product}", i + 1)?;
        }

        loop {
            write!(
                self.out,
                "Enter your selection (1 - {}): ",
                candidates.len()
            )?;
            self.out.flush()?;

            let Some(answer) = self.read_line().await? else {
                bail!("selection cancelled");
            };
            if let Some(id) = answer
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|choice| choice.checked_sub(1))
                .and_then(|index| candidates.get(index))
            {
                return Ok(*id);
            }
        }
    }

    // ========== Helpers ==========

    /// Apply an in-place edit to a product, returning its label afterwards.
    fn edit<F>(&mut self, id: &ProductId, f: F) -> Result<String>
    where
        F: FnOnce(&mut Product),
    {
        let product = self
            .app
            .graph_mut()
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        f(product);
        Ok(product.label())
    }

    fn label(&self, id: &ProductId) -> Result<String> {
        self.app
            .graph()
            .get(id)
            .map(Product::label)
            .ok_or_else(|| Error::NotFound(id.to_string()).into())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Whether `reference` is a full id or an id prefix rather than a name.
fn looks_like_id(reference: &str) -> bool {
    if reference.parse::<ProductId>().is_ok() {
        return true;
    }
    let hex_digits = reference.chars().filter(char::is_ascii_hexdigit).count();
    hex_digits >= MIN_ID_PREFIX_LEN
        && reference.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

/// Split a command line into words.
///
/// Whitespace separates words; single or double quotes group words with
/// spaces (`add "GFP plasmid" Primer`).
pub fn split_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        bail!("unterminated {q} quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("show", &["show"])]
    #[case("  add  Plasmid2   Plasmid1 ", &["add", "Plasmid2", "Plasmid1"])]
    #[case("add \"GFP plasmid\" Primer", &["add", "GFP plasmid", "Primer"])]
    #[case("note P 'it''s fine'", &["note", "P", "its fine"])]
    #[case("rename P \"\"", &["rename", "P", ""])]
    #[case("", &[])]
    fn test_split_line(#[case] line: &str, #[case] expected: &[&str]) {
        assert_eq!(split_line(line).unwrap(), expected);
    }

    #[rstest]
    #[case("0c5d2f3e-1111-4222-8333-944455556666", true)]
    #[case("0C5D2F3E", true)]
    #[case("0c5d2f3e-11", true)]
    #[case("deadbee", false)]
    #[case("Plasmid1", false)]
    #[case("-------", false)]
    fn test_looks_like_id(#[case] reference: &str, #[case] expected: bool) {
        assert_eq!(looks_like_id(reference), expected);
    }

    #[test]
    fn test_split_line_unterminated_quote() {
        let err = split_line("add \"GFP").unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }
}
