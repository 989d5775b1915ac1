//! Reading and writing Ising models in the UAI08 graphical-model format.
//!
//! # Format
//!
//! ```text
//! ISING
//! <sites>
//! 2 2 ... 2                        # domain size of every site
//! <unary> <binary> <beta> <mu>     # beta and mu are optional when reading
//! 1 <i>                            # one scope line per non-zero field
//! 2 <i> <j>                        # one scope line per non-zero coupling, i < j
//!
//! 2                                # function table of each field, in scope order
//!  -h h
//! 4                                # function table of each coupling, in scope order
//!  J -J
//!  -J J
//! ```
//!
//! Fields come first in site order, then couplings in row-major order; the function
//! tables repeat that order. Text after `#` is a comment, and blank lines are
//! ignored anywhere. A model without sites has an empty domain line.
//!
//! Reals are written in their shortest round-trip form, so reading a file back gives
//! bit-identical values. Small and large magnitudes use Rust's exponent notation
//! (`1e-7`, `6.02e23`), which differs textually from `1e-07` or `6.02e+23`; the
//! reader accepts either spelling.

use std::collections::{BTreeSet, VecDeque};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::model::IsingModel;
use crate::utils::{format_real, parse_real};

/// Renders `model` in UAI08 format.
pub fn uai08_string(model: &IsingModel) -> String {
    let mut out = String::new();

    // Preamble
    writeln!(out, "ISING").unwrap();
    writeln!(out, "{}", model.num_sites()).unwrap();
    writeln!(out, "{}", vec!["2"; model.num_sites()].join(" ")).unwrap();
    writeln!(
        out,
        "{} {} {} {}",
        model.num_unary_funcs(),
        model.num_binary_funcs(),
        format_real(model.beta()),
        format_real(model.mu())
    )
    .unwrap();
    for (i, _) in model.fields() {
        writeln!(out, "1 {}", i).unwrap();
    }
    for ((i, j), _) in model.couplings() {
        writeln!(out, "2 {} {}", i, j).unwrap();
    }
    writeln!(out).unwrap();

    // Function tables
    for (_, h) in model.fields() {
        writeln!(out, "2").unwrap();
        writeln!(out, " {} {}", format_real(-h), format_real(h)).unwrap();
    }
    for (_, value) in model.couplings() {
        writeln!(out, "4").unwrap();
        writeln!(out, " {} {}", format_real(value), format_real(-value)).unwrap();
        writeln!(out, " {} {}", format_real(-value), format_real(value)).unwrap();
    }

    out
}

/// Writes `model` in UAI08 format.
pub fn write_uai08<W: Write>(model: &IsingModel, mut writer: W) -> Result<()> {
    writer.write_all(uai08_string(model).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Comment-aware reader: yields only the meaningful part of each line.
struct Lines<R> {
    inner: R,
    line: usize,
    buf: String,
    pending: VecDeque<String>,
    pending_line: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            line: 0,
            buf: String::new(),
            pending: VecDeque::new(),
            pending_line: 0,
        }
    }

    /// Next non-empty line with comments stripped, with its 1-based line number.
    fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        loop {
            self.buf.clear();
            if self.inner.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let content = self.buf.split('#').next().unwrap_or("").trim();
            if !content.is_empty() {
                return Ok(Some((self.line, content.to_string())));
            }
        }
    }

    fn expect_line(&mut self, what: &str) -> Result<(usize, String)> {
        self.next_line()?
            .ok_or_else(|| Error::parse(self.line, format!("unexpected end of input, expected {}", what)))
    }

    /// Next whitespace-separated token, crossing line boundaries.
    fn next_token(&mut self) -> Result<Option<(usize, String)>> {
        while self.pending.is_empty() {
            match self.next_line()? {
                Some((line, content)) => {
                    self.pending_line = line;
                    self.pending.extend(content.split_whitespace().map(str::to_string));
                }
                None => return Ok(None),
            }
        }
        Ok(self.pending.pop_front().map(|token| (self.pending_line, token)))
    }

    fn expect_token(&mut self, what: &str) -> Result<(usize, String)> {
        self.next_token()?
            .ok_or_else(|| Error::parse(self.line, format!("unexpected end of input, expected {}", what)))
    }

    fn expect_real(&mut self, what: &str) -> Result<f64> {
        let (line, token) = self.expect_token(what)?;
        parse_real_token(line, &token, what)
    }
}

fn parse_index(line: usize, token: &str, what: &str) -> Result<usize> {
    token
        .parse::<usize>()
        .map_err(|_| Error::parse(line, format!("invalid {}: {:?}", what, token)))
}

fn parse_real_token(line: usize, token: &str, what: &str) -> Result<f64> {
    match parse_real(token) {
        Some(x) if x.is_finite() => Ok(x),
        _ => Err(Error::parse(line, format!("invalid {}: {:?}", what, token))),
    }
}

fn check_site(line: usize, site: usize, num_sites: usize) -> Result<()> {
    if site < num_sites {
        Ok(())
    } else {
        Err(Error::parse(
            line,
            format!("site {} out of range for {} sites", site, num_sites),
        ))
    }
}

/// Reads the function-table marker and checks it against the scope arity.
fn expect_marker<R: BufRead>(lines: &mut Lines<R>, expected: usize) -> Result<()> {
    let (line, token) = lines.expect_token("function table size")?;
    if token.parse::<usize>().ok() == Some(expected) {
        Ok(())
    } else {
        Err(Error::ArityMismatch {
            line,
            expected,
            found: token,
        })
    }
}

/// Reads a model in UAI08 format.
pub fn read_uai08<R: BufRead>(reader: R) -> Result<IsingModel> {
    let mut lines = Lines::new(reader);

    // Header
    let (line, header) = lines.expect_line("header")?;
    if !header.starts_with("ISING") {
        return Err(Error::MalformedHeader { line, found: header });
    }

    let (line, content) = lines.expect_line("number of sites")?;
    let num_sites = parse_index(line, &content, "number of sites")?;

    if num_sites > 0 {
        let (line, content) = lines.expect_line("domain sizes")?;
        let domains: Vec<&str> = content.split_whitespace().collect();
        if domains.len() != num_sites || domains.iter().any(|&d| d != "2") {
            return Err(Error::parse(
                line,
                format!("expected {} binary domains, found {:?}", num_sites, content),
            ));
        }
    }

    // Function counts, optionally followed by beta and mu
    let (line, content) = lines.expect_line("function counts")?;
    let meta: Vec<&str> = content.split_whitespace().collect();
    if meta.len() < 2 || meta.len() > 4 {
        return Err(Error::parse(
            line,
            format!("expected `<unary> <binary> [beta [mu]]`, found {:?}", content),
        ));
    }
    let num_unary = parse_index(line, meta[0], "number of unary functions")?;
    let num_binary = parse_index(line, meta[1], "number of binary functions")?;
    let max_binary = num_sites
        .checked_mul(num_sites.saturating_sub(1))
        .map_or(usize::MAX, |pairs| pairs / 2);
    if num_unary > num_sites || num_binary > max_binary {
        return Err(Error::parse(
            line,
            format!(
                "{} unary and {} binary functions exceed what {} sites allow",
                num_unary, num_binary, num_sites
            ),
        ));
    }
    let beta = match meta.get(2) {
        Some(token) => parse_real_token(line, token, "beta")?,
        None => 1.0,
    };
    let mu = match meta.get(3) {
        Some(token) => parse_real_token(line, token, "mu")?,
        None => 1.0,
    };

    // Scopes
    let mut unary_scopes = Vec::new();
    let mut seen_sites = BTreeSet::new();
    for _ in 0..num_unary {
        let (line, content) = lines.expect_line("unary scope")?;
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.len() != 2 || tokens[0] != "1" {
            return Err(Error::parse(line, format!("expected `1 <i>`, found {:?}", content)));
        }
        let i = parse_index(line, tokens[1], "site")?;
        check_site(line, i, num_sites)?;
        if !seen_sites.insert(i) {
            return Err(Error::parse(line, format!("field of site {} declared twice", i)));
        }
        unary_scopes.push(i);
    }

    let mut binary_scopes = Vec::new();
    let mut seen_pairs = BTreeSet::new();
    for _ in 0..num_binary {
        let (line, content) = lines.expect_line("binary scope")?;
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.len() != 3 || tokens[0] != "2" {
            return Err(Error::parse(line, format!("expected `2 <i> <j>`, found {:?}", content)));
        }
        let i = parse_index(line, tokens[1], "site")?;
        let j = parse_index(line, tokens[2], "site")?;
        check_site(line, i, num_sites)?;
        check_site(line, j, num_sites)?;
        if i >= j {
            return Err(Error::parse(
                line,
                format!("coupling ({}, {}) is not above the diagonal", i, j),
            ));
        }
        if !seen_pairs.insert((i, j)) {
            return Err(Error::parse(line, format!("coupling ({}, {}) declared twice", i, j)));
        }
        binary_scopes.push((i, j));
    }

    // Function tables
    let mut model = IsingModel::new(num_sites, beta, mu)?;
    for i in unary_scopes {
        expect_marker(&mut lines, 2)?;
        let low = lines.expect_real("field value")?;
        let h = lines.expect_real("field value")?;
        if low != -h {
            warn!("Field table of site {} is not of the form [-h, h]: [{}, {}]", i, low, h);
        }
        model.set_field(i, h)?;
    }
    for (i, j) in binary_scopes {
        expect_marker(&mut lines, 4)?;
        let mut table = [0.0; 4];
        for value in table.iter_mut() {
            *value = lines.expect_real("coupling value")?;
        }
        let value = table[0];
        if table != [value, -value, -value, value] {
            warn!(
                "Coupling table of ({}, {}) is not of the form [J, -J, -J, J]: {:?}",
                i, j, table
            );
        }
        model.set_coupling(i, j, value)?;
    }

    if let Some((line, token)) = lines.next_token()? {
        warn!("Ignoring trailing content starting at line {}: {:?}", line, token);
    }

    debug!(
        "Read UAI08 model: {} sites, {} fields, {} couplings",
        model.num_sites(),
        model.num_unary_funcs(),
        model.num_binary_funcs()
    );
    Ok(model)
}

impl IsingModel {
    /// Writes the model to `path` in UAI08 format.
    pub fn to_uai08<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        write_uai08(self, BufWriter::new(file))
    }

    /// Renders the model in UAI08 format.
    pub fn to_uai08_string(&self) -> String {
        uai08_string(self)
    }

    /// Reads a model from a UAI08 file.
    pub fn from_uai08<P: AsRef<Path>>(path: P) -> Result<IsingModel> {
        let file = File::open(path)?;
        read_uai08(BufReader::new(file))
    }

    /// Parses a model from UAI08 text.
    pub fn from_uai08_str(content: &str) -> Result<IsingModel> {
        read_uai08(content.as_bytes())
    }
}
