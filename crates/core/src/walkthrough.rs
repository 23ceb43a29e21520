//! Step sequences for the guided carry/borrow demos.
//!
//! The builders produce the complete, ordered list of step descriptors for a
//! three-digit column addition or subtraction. Playback timing is someone
//! else's problem: `StepPlayer` advances on explicit `next()` calls, so the
//! sequences are testable without timers.

/// Number of digit columns in a walkthrough problem.
pub const COLUMNS: usize = 3;

/// One step of a carry or borrow walkthrough.
///
/// Columns are indexed from the right: column 0 is the ones place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Highlight a column and add it (including any carry coming in).
    AddColumn {
        col: usize,
        top: u8,
        bottom: u8,
        carry_in: u8,
        sum: u8,
    },
    /// The column summed to 10 or more: write the ones digit and carry 1.
    Carry { col: usize, digit: u8 },
    /// The top digit is too small: borrow 10 from the next column.
    Borrow { col: usize, from: usize, new_top: u8 },
    /// Highlight a column and subtract it (after any borrow).
    SubtractColumn { col: usize, top: u8, bottom: u8 },
    /// Write a digit of the answer.
    Write { col: usize, digit: u8 },
    /// A carry walked off the leftmost column: write the leading 1.
    FinalCarry,
    /// All columns done.
    Complete { answer: u32 },
}

fn digits(n: u32) -> [u8; COLUMNS] {
    let mut out = [0; COLUMNS];
    let mut n = n;
    for slot in &mut out {
        *slot = (n % 10) as u8;
        n /= 10;
    }
    out
}

/// Build the full step sequence for `a + b` worked column by column.
///
/// Both operands are taken modulo 1000.
#[must_use]
pub fn carry_steps(a: u32, b: u32) -> Vec<Step> {
    let a = a % 1000;
    let b = b % 1000;
    let top = digits(a);
    let bottom = digits(b);

    let mut steps = Vec::new();
    let mut carry = 0_u8;

    for col in 0..COLUMNS {
        let sum = top[col] + bottom[col] + carry;
        steps.push(Step::AddColumn {
            col,
            top: top[col],
            bottom: bottom[col],
            carry_in: carry,
            sum,
        });

        if sum >= 10 {
            steps.push(Step::Carry {
                col,
                digit: sum % 10,
            });
            carry = 1;
        } else {
            steps.push(Step::Write { col, digit: sum });
            carry = 0;
        }
    }

    if carry > 0 {
        steps.push(Step::FinalCarry);
    }
    steps.push(Step::Complete { answer: a + b });
    steps
}

/// Build the full step sequence for `a - b` worked column by column.
///
/// Both operands are taken modulo 1000 and `a` must not be smaller than `b`;
/// a smaller `a` yields the sequence for `b - a` instead of underflowing.
#[must_use]
pub fn borrow_steps(a: u32, b: u32) -> Vec<Step> {
    let a = a % 1000;
    let b = b % 1000;
    let (a, b) = if a >= b { (a, b) } else { (b, a) };

    let bottom = digits(b);
    let mut working: [i16; COLUMNS] = digits(a).map(i16::from);

    let mut steps = Vec::new();

    for col in 0..COLUMNS {
        if working[col] < i16::from(bottom[col]) {
            // A cascaded borrow can leave the working digit at -1, which
            // becomes 9 here -- the "zero turns into nine" teaching moment.
            working[col] += 10;
            if col + 1 < COLUMNS {
                working[col + 1] -= 1;
            }
            steps.push(Step::Borrow {
                col,
                from: col + 1,
                new_top: working[col] as u8,
            });
        }

        let top = working[col] as u8;
        steps.push(Step::SubtractColumn {
            col,
            top,
            bottom: bottom[col],
        });
        steps.push(Step::Write {
            col,
            digit: top - bottom[col],
        });
    }

    steps.push(Step::Complete { answer: a - b });
    steps
}

/// True when adding `a + b` carries in at least one column.
///
/// Columns are judged pairwise, without carry propagation, which is exactly
/// the check the problem generators want.
#[must_use]
pub fn needs_carry(a: u32, b: u32) -> bool {
    let top = digits(a % 1000);
    let bottom = digits(b % 1000);
    (0..COLUMNS).any(|col| top[col] + bottom[col] >= 10)
}

/// True when subtracting `a - b` borrows in at least one column.
#[must_use]
pub fn needs_borrow(a: u32, b: u32) -> bool {
    let top = digits(a % 1000);
    let bottom = digits(b % 1000);
    (0..COLUMNS).any(|col| top[col] < bottom[col])
}

/// Restartable driver over a step sequence.
///
/// The UI advances it on a fixed interval or on explicit "next" clicks; the
/// player itself knows nothing about time.
#[derive(Debug, Clone)]
pub struct StepPlayer {
    steps: Vec<Step>,
    pos: usize,
}

impl StepPlayer {
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps, pos: 0 }
    }

    /// Player for a carry-addition walkthrough of `a + b`.
    #[must_use]
    pub fn carry(a: u32, b: u32) -> Self {
        Self::new(carry_steps(a, b))
    }

    /// Player for a borrow-subtraction walkthrough of `a - b`.
    #[must_use]
    pub fn borrow(a: u32, b: u32) -> Self {
        Self::new(borrow_steps(a, b))
    }

    /// Advance and return the next step, or `None` once the sequence is done.
    pub fn next_step(&mut self) -> Option<&Step> {
        let step = self.steps.get(self.pos)?;
        self.pos += 1;
        Some(step)
    }

    /// The most recently returned step.
    #[must_use]
    pub fn current(&self) -> Option<&Step> {
        self.pos.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    /// Rewind to the start without rebuilding the sequence.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.pos >= self.steps.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}
