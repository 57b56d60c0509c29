//! The induction driver.
//!
//! Runs the mine → select → replace fixpoint over a [`Block`], then the
//! cleanup passes, and hands back a finished [`Grammar`]:
//!
//! ```text
//! Mining → Selecting → Replacing ─┐
//!    ↑                            │ progress
//!    └────────────────────────────┘
//! Selecting / Replacing ── nothing left ──→ Cleanup → Remapping → Done
//! Selecting / Replacing ── empty dictionary ──→ Failed(NothingToCompress)
//! ```

use crate::block::Block;
use crate::cleanup;
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::grammar::Grammar;
use crate::histogram::Histogram;
use crate::id_gen::SymbolAllocator;
use crate::pattern::{self, Pattern};
use crate::policy::{Candidate, Selection, Selector};
use crate::replace::{replace_all, sweep};
use crate::symbol::Symbol;
use ahash::AHashMap as HashMap;
use tracing::{debug, trace};

/// Default number of ranked candidates probed per pass.
pub const DEFAULT_MAX_PROBES: usize = 32;

/// Phases of an induction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Mining,
    Selecting,
    Replacing,
    Cleanup,
    Remapping,
    Done,
    Failed,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct Induced {
    pub grammar: Grammar,
    /// Replace passes that made progress.
    pub passes: usize,
}

/// What one replace pass achieved.
enum Progress {
    /// Symbols replaced in the block.
    Replaced(usize),
    /// The best remaining candidate saves too little to continue.
    Decayed,
}

/// One compression run over one input.
///
/// Owns the block and the dictionary exclusively until [`Induction::run`]
/// hands back the grammar. [`Induction::step`] advances one phase at a time.
pub struct Induction<'a> {
    selector: &'a dyn Selector,
    max_probes: usize,
    input_len: usize,
    block: Block,
    /// The block copied out of the list once induction stops.
    finished: Vec<Symbol>,
    dictionary: Dictionary,
    reverse: HashMap<Pattern, Symbol>,
    allocator: SymbolAllocator,
    histogram: Histogram,
    selection: Selection,
    previous_best: Option<usize>,
    passes: usize,
    phase: Phase,
}

impl<'a> Induction<'a> {
    pub fn new(input: &[u8], selector: &'a dyn Selector) -> Self {
        Self {
            selector,
            max_probes: DEFAULT_MAX_PROBES,
            input_len: input.len(),
            block: Block::from_bytes(input),
            finished: Vec::new(),
            dictionary: Dictionary::new(),
            reverse: HashMap::default(),
            allocator: SymbolAllocator::new(),
            histogram: Histogram::default(),
            selection: Selection::Ranked(Vec::new()),
            previous_best: None,
            passes: 0,
            phase: Phase::Mining,
        }
    }

    /// Caps how many ranked candidates a pass may try.
    pub fn with_max_probes(mut self, max_probes: usize) -> Self {
        self.max_probes = max_probes.max(1);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Replace passes that made progress so far.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Block length plus every rule body length.
    pub fn symbol_count(&self) -> usize {
        self.block.len() + self.finished.len() + self.dictionary.body_len()
    }

    /// Performs the work of the current phase and moves to the next one.
    ///
    /// `Done` and `Failed` are terminal; stepping them again is a no-op.
    pub fn step(&mut self) -> Result<Phase> {
        trace!(phase = ?self.phase, "induction");

        self.phase = match self.phase {
            Phase::Mining => {
                self.histogram = Histogram::mine(&self.block, self.selector.window());
                Phase::Selecting
            }
            Phase::Selecting => {
                self.selection = self.selector.select(&self.histogram);
                if self.selection.is_empty() {
                    self.exhausted()
                } else {
                    Phase::Replacing
                }
            }
            Phase::Replacing => {
                let selection =
                    std::mem::replace(&mut self.selection, Selection::Ranked(Vec::new()));
                match self.apply(&selection)? {
                    Progress::Replaced(0) => self.exhausted(),
                    Progress::Replaced(_) => {
                        self.passes += 1;
                        self.report("pass");
                        Phase::Mining
                    }
                    Progress::Decayed => {
                        debug!(passes = self.passes, "benefit decayed, stopping");
                        Phase::Cleanup
                    }
                }
            }
            Phase::Cleanup => {
                let mut block = std::mem::take(&mut self.block).to_vec();
                let inlined = cleanup::eliminate_singletons(&mut block, &mut self.dictionary);
                let trimmed = cleanup::trim(&block, &mut self.dictionary);
                self.finished = block;

                debug!(
                    inlined,
                    trimmed,
                    allocated = self.allocator.allocated(),
                    rules = self.dictionary.len(),
                    "cleanup finished"
                );
                Phase::Remapping
            }
            Phase::Remapping => {
                cleanup::remap(&mut self.finished, &mut self.dictionary)?;
                Phase::Done
            }
            Phase::Done => Phase::Done,
            Phase::Failed => Phase::Failed,
        };

        Ok(self.phase)
    }

    /// Runs to completion.
    ///
    /// Fails with [`Error::NothingToCompress`] if no rule could be created.
    pub fn run(mut self) -> Result<Induced> {
        loop {
            match self.step()? {
                Phase::Done => break,
                Phase::Failed => {
                    return Err(Error::NothingToCompress {
                        len: self.input_len,
                    });
                }
                _ => {}
            }
        }

        Ok(Induced {
            grammar: Grammar::new(self.dictionary, self.finished),
            passes: self.passes,
        })
    }

    /// Where to go once no candidate makes progress.
    fn exhausted(&self) -> Phase {
        if self.dictionary.is_empty() {
            Phase::Failed
        } else {
            Phase::Cleanup
        }
    }

    fn apply(&mut self, selection: &Selection) -> Result<Progress> {
        match selection {
            Selection::Ranked(candidates) => self.replace_best(candidates),
            Selection::Sweep(patterns) => {
                let Self {
                    block,
                    dictionary,
                    reverse,
                    allocator,
                    ..
                } = self;
                let replaced = sweep(block, patterns, |pair| {
                    assign(dictionary, reverse, allocator, pair)
                })?;
                Ok(Progress::Replaced(replaced))
            }
        }
    }

    /// Replaces the first ranked candidate that still pays for its rule.
    ///
    /// The miner counts overlapping occurrences, so each candidate is
    /// recounted left to right. It is accepted only with at least two
    /// occurrences and when `occurrences × (len − 1) ≥ len`, so block plus
    /// dictionary never grows.
    fn replace_best(&mut self, candidates: &[Candidate]) -> Result<Progress> {
        for candidate in candidates.iter().take(self.max_probes) {
            let len = candidate.pattern.len();
            if len < 2 {
                continue;
            }

            let occurrences = pattern::count(&self.block, &candidate.pattern);
            if occurrences < 2 || occurrences * (len - 1) < len {
                trace!(pattern = ?candidate.pattern, occurrences, "candidate does not pay");
                continue;
            }

            if self.selector.decays() {
                if let Some(previous) = self.previous_best {
                    if candidate.score * 2 < previous {
                        return Ok(Progress::Decayed);
                    }
                }
            }

            let symbol = assign(
                &mut self.dictionary,
                &mut self.reverse,
                &mut self.allocator,
                &candidate.pattern,
            );
            let replaced = replace_all(&mut self.block, &candidate.pattern, symbol)?;
            if replaced != occurrences {
                return Err(Error::internal(format!(
                    "expected {occurrences} replacements of {:?}, made {replaced}",
                    candidate.pattern
                )));
            }

            trace!(pattern = ?candidate.pattern, %symbol, replaced, "replaced");
            self.previous_best = Some(candidate.score);
            return Ok(Progress::Replaced(replaced));
        }

        Ok(Progress::Replaced(0))
    }

    fn report(&self, what: &str) {
        let rule_symbols: usize = self
            .dictionary
            .iter()
            .map(|(_, body)| body.len() + 1)
            .sum();

        debug!(
            pass = self.passes,
            document = self.block.len(),
            rules = self.dictionary.len(),
            rule_symbols,
            total = self.block.len() + rule_symbols,
            "{what}"
        );
    }
}

/// Returns the symbol already assigned to `pattern`, or allocates one and
/// records the rule.
fn assign(
    dictionary: &mut Dictionary,
    reverse: &mut HashMap<Pattern, Symbol>,
    allocator: &mut SymbolAllocator,
    pattern: &Pattern,
) -> Symbol {
    if let Some(&symbol) = reverse.get(pattern) {
        return symbol;
    }

    let symbol = allocator.get();
    dictionary.insert(symbol, pattern.symbols().to_vec());
    reverse.insert(pattern.clone(), symbol);
    symbol
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{BestCandidate, NgramSet};

    fn lit(text: &str) -> Vec<Symbol> {
        text.bytes().map(Symbol::literal).collect()
    }

    #[test]
    fn test_run_of_four() {
        let selector = BestCandidate::new(4);
        let induced = Induction::new(b"aaaa", &selector).run().unwrap();
        let g = &induced.grammar;

        assert_eq!(g.dictionary().len(), 1);
        assert_eq!(g.dictionary().get(Symbol::FIRST), Some(&lit("aa")[..]));
        assert_eq!(g.block(), &[Symbol::FIRST, Symbol::FIRST]);
        assert_eq!(g.expand().unwrap(), b"aaaa");
    }

    #[test]
    fn test_repeated_abc() {
        let selector = BestCandidate::new(3);
        let induced = Induction::new(b"abcabcabcabc", &selector).run().unwrap();
        let g = &induced.grammar;

        let has_abc = g.dictionary().iter().any(|(_, body)| body == lit("abc").as_slice());
        assert!(has_abc, "dictionary: {:?}", g.dictionary());
        assert!(g.block().len() <= 4);
        assert_eq!(g.expand().unwrap(), b"abcabcabcabc");
    }

    #[test]
    fn test_nothing_to_compress() {
        let selector = BestCandidate::new(4);
        let err = Induction::new(b"xyz", &selector).run().unwrap_err();
        assert!(matches!(err, Error::NothingToCompress { len: 3 }));
    }

    #[test]
    fn test_overlapping_only_is_nothing_to_compress() {
        // "aa" is counted twice by the miner but only fits once
        let selector = BestCandidate::new(4);
        let err = Induction::new(b"aaa", &selector).run().unwrap_err();
        assert!(matches!(err, Error::NothingToCompress { .. }));
    }

    #[test]
    fn test_empty_input() {
        let selector = BestCandidate::new(4);
        let err = Induction::new(b"", &selector).run().unwrap_err();
        assert!(matches!(err, Error::NothingToCompress { len: 0 }));
    }

    #[test]
    fn test_ngram_set_sweep() {
        let input = b"abababababababab";
        let selector = NgramSet::default();
        let induced = Induction::new(input, &selector).run().unwrap();

        assert!(induced.passes >= 1);
        assert_eq!(induced.grammar.expand().unwrap(), input);
        assert!(induced.grammar.block().len() < input.len());
    }

    #[test]
    fn test_rules_are_dense_after_run() {
        let input = b"the cat and the hat and the bat and the mat";
        let selector = BestCandidate::new(5);
        let g = Induction::new(input, &selector).run().unwrap().grammar;

        for (i, (symbol, _)) in g.dictionary().iter().enumerate() {
            assert_eq!(symbol, Symbol::new(256 + i as i32));
        }
        assert_eq!(g.expand().unwrap(), input);
        g.validate().unwrap();
    }

    #[test]
    fn test_phases_in_order() {
        let selector = BestCandidate::new(3);
        let mut induction = Induction::new(b"abcabcabcabc", &selector);
        let mut seen = vec![induction.phase()];

        while !matches!(induction.phase(), Phase::Done | Phase::Failed) {
            seen.push(induction.step().unwrap());
        }

        assert_eq!(
            &seen[..4],
            &[Phase::Mining, Phase::Selecting, Phase::Replacing, Phase::Mining]
        );
        assert_eq!(
            &seen[seen.len() - 3..],
            &[Phase::Cleanup, Phase::Remapping, Phase::Done]
        );
        assert_eq!(induction.step().unwrap(), Phase::Done);
    }

    #[test]
    fn test_cleanup_and_remap_phases() {
        // Cleanup only ever removes rules; remapping leaves them dense.
        let selector = BestCandidate {
            max_window: 3,
            decay: false,
        };
        let mut induction = Induction::new(b"abcabcabcabc", &selector);
        while induction.phase() != Phase::Cleanup {
            induction.step().unwrap();
        }
        let rules_before = induction.dictionary().len();

        assert_eq!(induction.step().unwrap(), Phase::Remapping);
        assert!(induction.dictionary().len() <= rules_before);

        assert_eq!(induction.step().unwrap(), Phase::Done);
        for (i, (symbol, _)) in induction.dictionary().iter().enumerate() {
            assert_eq!(symbol, Symbol::new(256 + i as i32));
        }
    }

    #[test]
    fn test_failed_phase_is_terminal() {
        let selector = BestCandidate::new(3);
        let mut induction = Induction::new(b"xyz", &selector);
        assert_eq!(induction.step().unwrap(), Phase::Selecting);
        assert_eq!(induction.step().unwrap(), Phase::Failed);
        assert_eq!(induction.step().unwrap(), Phase::Failed);
    }

    #[test]
    fn test_decay_stops_on_weak_second_candidate() {
        // "abc" saves 12; the only other repeat, "xy", saves 4 < 12 / 2
        let input = b"abc1abc2abc3abc4xy5xy";
        let decaying = BestCandidate::new(3);
        let patient = BestCandidate {
            max_window: 3,
            decay: false,
        };

        let short = Induction::new(input, &decaying).run().unwrap();
        let long = Induction::new(input, &patient).run().unwrap();

        assert_eq!(short.passes, 1);
        assert_eq!(long.passes, 2);
        assert_eq!(short.grammar.dictionary().len(), 1);
        assert_eq!(long.grammar.dictionary().len(), 2);
        assert_eq!(short.grammar.expand().unwrap(), input);
        assert_eq!(long.grammar.expand().unwrap(), input);
    }

    #[test]
    fn test_decayed_replace_goes_straight_to_cleanup() {
        let input = b"abc1abc2abc3abc4xy5xy";
        let selector = BestCandidate::new(3);
        let mut induction = Induction::new(input, &selector);

        let mut phases = Vec::new();
        while !matches!(induction.phase(), Phase::Done | Phase::Failed) {
            phases.push(induction.step().unwrap());
        }

        // mine, select, replace "abc", mine, select, decay
        assert_eq!(phases[5], Phase::Cleanup);
        assert_eq!(induction.passes(), 1);
    }

    #[test]
    fn test_each_step_never_grows() {
        let inputs: [&[u8]; 3] = [
            b"the cat and the hat and the bat and the mat",
            b"abcabcabcabc",
            b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaab",
        ];

        for input in inputs {
            let selector = BestCandidate {
                max_window: 5,
                decay: false,
            };
            let mut induction = Induction::new(input, &selector);
            let mut size = induction.symbol_count();
            assert_eq!(size, input.len());

            while !matches!(induction.phase(), Phase::Done | Phase::Failed) {
                let phase = induction.phase();
                induction.step().unwrap();
                let now = induction.symbol_count();
                assert!(now <= size, "{phase:?} grew {size} -> {now} on {input:?}");
                size = now;
            }
        }
    }

    #[test]
    fn test_max_probes_floor() {
        let selector = BestCandidate::new(3);
        let induction = Induction::new(b"abab", &selector).with_max_probes(0);
        assert_eq!(induction.max_probes, 1);
        assert_eq!(induction.phase(), Phase::Mining);
    }
}
