use anyhow::{Context, Result};
use colored::Colorize;
use conjure_engine::{encoding, initializer, selector, Diagnostic};
use proc_macro2::TokenStream;
use quote::ToTokens;
use rand::Rng;
use serde::Serialize;
use std::fs;
use std::path::Path;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::visit::{self, Visit};
use syn::{Attribute, Item, Macro, Meta, Token};

use crate::config::{rng_for, ConjureConfig};
use crate::ui;

const PUBLIC_INIT: &str = "public_init";
const OBFUSCATE: &str = "obfuscate";
const BUILD_CONFIG: &str = "build_config";

/// One directive found in the source file.
#[derive(Debug)]
pub struct Site {
    pub line: usize,
    pub directive: &'static str,
    pub target: Option<String>,
    pub outcome: std::result::Result<TokenStream, Diagnostic>,
}

#[derive(Debug, Serialize)]
struct SiteReport {
    line: usize,
    directive: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expansion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&Site> for SiteReport {
    fn from(site: &Site) -> Self {
        let (expansion, error) = match &site.outcome {
            Ok(tokens) => (Some(tokens.to_string()), None),
            Err(diagnostic) => (None, Some(diagnostic.to_string())),
        };
        SiteReport {
            line: site.line,
            directive: site.directive,
            target: site.target.clone(),
            expansion,
            error,
        }
    }
}

/// Walks a parsed file and expands every directive it meets. Each site is
/// expanded independently, so one failure never hides the rest.
struct SiteCollector<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    sites: Vec<Site>,
}

impl<'a, R: Rng + ?Sized> SiteCollector<'a, R> {
    fn new(rng: &'a mut R) -> Self {
        Self {
            rng,
            sites: Vec::new(),
        }
    }

    fn expand_item(&mut self, node: &Item, attr: &Attribute) {
        let args = match &attr.meta {
            Meta::Path(_) => TokenStream::new(),
            Meta::List(list) => list.tokens.clone(),
            Meta::NameValue(name_value) => name_value.value.to_token_stream(),
        };

        // The compiler hands the macro the item without its own attribute.
        let mut item = node.clone();
        if let Some(attrs) = item_attrs_mut(&mut item) {
            attrs.retain(|a| !is_directive(a.path(), PUBLIC_INIT));
        }

        self.sites.push(Site {
            line: attr.span().start().line,
            directive: PUBLIC_INIT,
            target: item_name(node),
            outcome: initializer::expand(args, item.to_token_stream()),
        });
    }

    /// Macro bodies are plain tokens to `syn`, so directives nested inside
    /// another macro call are found by reparsing its arguments.
    fn visit_arguments(&mut self, mac: &Macro) {
        let parser = Punctuated::<selector::Argument, Token![,]>::parse_terminated;
        if let Ok(arguments) = mac.parse_body_with(parser) {
            for argument in &arguments {
                self.visit_expr(&argument.value);
            }
        }
    }
}

impl<'ast, R: Rng + ?Sized> Visit<'ast> for SiteCollector<'_, R> {
    fn visit_item(&mut self, node: &'ast Item) {
        let directive = item_attrs(node)
            .iter()
            .find(|attr| is_directive(attr.path(), PUBLIC_INIT));
        if let Some(attr) = directive {
            self.expand_item(node, attr);
        }
        visit::visit_item(self, node);
    }

    fn visit_macro(&mut self, node: &'ast Macro) {
        let line = node.path.span().start().line;
        if is_directive(&node.path, OBFUSCATE) {
            let outcome = encoding::expand_with(node.tokens.clone(), &mut *self.rng);
            self.sites.push(Site {
                line,
                directive: OBFUSCATE,
                target: None,
                outcome,
            });
        } else {
            if is_directive(&node.path, BUILD_CONFIG) {
                self.sites.push(Site {
                    line,
                    directive: BUILD_CONFIG,
                    target: None,
                    outcome: selector::expand(node.tokens.clone()),
                });
            }
            self.visit_arguments(node);
        }
        visit::visit_macro(self, node);
    }
}

/// The attribute can sit on any item; only structs expand, the rest report
/// what they are.
fn item_attrs(item: &Item) -> &[Attribute] {
    match item {
        Item::Struct(item) => &item.attrs,
        Item::Enum(item) => &item.attrs,
        Item::Union(item) => &item.attrs,
        Item::Trait(item) => &item.attrs,
        Item::Impl(item) => &item.attrs,
        Item::Fn(item) => &item.attrs,
        Item::Type(item) => &item.attrs,
        _ => &[],
    }
}

fn item_attrs_mut(item: &mut Item) -> Option<&mut Vec<Attribute>> {
    match item {
        Item::Struct(item) => Some(&mut item.attrs),
        Item::Enum(item) => Some(&mut item.attrs),
        Item::Union(item) => Some(&mut item.attrs),
        Item::Trait(item) => Some(&mut item.attrs),
        Item::Impl(item) => Some(&mut item.attrs),
        Item::Fn(item) => Some(&mut item.attrs),
        Item::Type(item) => Some(&mut item.attrs),
        _ => None,
    }
}

fn item_name(item: &Item) -> Option<String> {
    let ident = match item {
        Item::Struct(item) => &item.ident,
        Item::Enum(item) => &item.ident,
        Item::Union(item) => &item.ident,
        Item::Trait(item) => &item.ident,
        Item::Fn(item) => &item.sig.ident,
        Item::Type(item) => &item.ident,
        _ => return None,
    };
    Some(ident.to_string())
}

/// Matches `name` and any path ending in it, such as `conjure::name`.
fn is_directive(path: &syn::Path, name: &str) -> bool {
    path.segments
        .last()
        .is_some_and(|segment| segment.ident == name)
}

/// Parse `source` and expand every directive in it, in source order.
pub fn collect_sites<R: Rng + ?Sized>(source: &str, rng: &mut R) -> Result<Vec<Site>> {
    let file = syn::parse_file(source).context("Failed to parse Rust source")?;
    let mut collector = SiteCollector::new(rng);
    collector.visit_file(&file);
    let mut sites = collector.sites;
    sites.sort_by_key(|site| site.line);
    Ok(sites)
}

pub fn run(config_path: &str, file: &Path, seed: Option<&str>, json: bool) -> Result<()> {
    let config = ConjureConfig::load_or_default(config_path)?;
    let seed = seed.or(config.encode.seed.as_deref());

    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read source file: {}", file.display()))?;
    let sites = collect_sites(&source, &mut rng_for(seed))
        .with_context(|| format!("Failed to expand {}", file.display()))?;
    let failed = sites.iter().filter(|site| site.outcome.is_err()).count();
    tracing::info!(sites = sites.len(), failed, "expanded {}", file.display());

    if json {
        let reports: Vec<SiteReport> = sites.iter().map(SiteReport::from).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_sites(file, &sites);
    }

    if failed > 0 {
        anyhow::bail!("{} of {} directive(s) failed to expand", failed, sites.len());
    }
    Ok(())
}

fn print_sites(file: &Path, sites: &[Site]) {
    if sites.is_empty() {
        ui::print_warning(&format!("No directives found in {}", file.display()));
        return;
    }

    ui::print_step(&format!(
        "{} directive(s) in {}",
        sites.len(),
        file.display()
    ));
    for site in sites {
        let title = match &site.target {
            Some(target) => format!("{}:{} #[{}] {}", file.display(), site.line, site.directive, target),
            None => format!("{}:{} {}!", file.display(), site.line, site.directive),
        };
        ui::print_section(&title);
        match &site.outcome {
            Ok(tokens) => println!("{}", tokens.to_string().cyan()),
            Err(diagnostic) => ui::print_error(&format!("error: {}", diagnostic)),
        }
    }
    println!();
}
