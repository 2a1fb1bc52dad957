use serde::Serialize;

/// One row of the interference table.
///
/// `first_halves` and `second_halves` are how many halves of the best and
/// second-best counted waves are removed from the raw sum (0, 1 or 2). A
/// deduction only applies when the referenced wave exists. `disqualify`
/// overrides everything and forces the total to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Penalty {
    pub label: &'static str,
    pub short_label: &'static str,
    pub first_halves: u8,
    pub second_halves: u8,
    pub disqualify: bool,
}

impl Penalty {
    const fn deduct(
        label: &'static str,
        short_label: &'static str,
        first_halves: u8,
        second_halves: u8,
    ) -> Self {
        Penalty {
            label,
            short_label,
            first_halves,
            second_halves,
            disqualify: false,
        }
    }
}

const NONE: Penalty = Penalty::deduct("None", "None", 0, 0);
const INT_1: Penalty = Penalty::deduct("INT-1 (½ 2nd - Non-Priority)", "INT-1", 0, 1);
const INT_2: Penalty = Penalty::deduct("INT-2 (0 2nd - Priority)", "INT-2", 0, 2);
const INT_3: Penalty = Penalty::deduct("INT-3 (0 1st - Last 5min)", "INT-3", 2, 0);
const DOUBLE_HALVE_FIRST: Penalty = Penalty::deduct("2x INT (½ 1st, 0 2nd)", "2x INT", 1, 2);
const DOUBLE_ZERO_BOTH: Penalty = Penalty::deduct("2x INT (0 both)", "2x INT", 2, 2);
const DISQUALIFIED: Penalty = Penalty {
    label: "DISQUALIFIED",
    short_label: "DQ",
    first_halves: 0,
    second_halves: 0,
    disqualify: true,
};

const ISA_TABLE: &[Penalty] = &[
    NONE,
    INT_1,
    INT_2,
    INT_3,
    DOUBLE_HALVE_FIRST,
    DOUBLE_ZERO_BOTH,
    DISQUALIFIED,
];
const CLASSIC_TABLE: &[Penalty] = &[NONE, INT_1, INT_2];

/// Wave capacity plus the interference table, keyed by code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSet {
    pub name: &'static str,
    pub wave_capacity: usize,
    penalties: &'static [Penalty],
}

impl RuleSet {
    /// 20 wave slots, interference codes 0..=6.
    pub fn isa() -> Self {
        RuleSet {
            name: "isa",
            wave_capacity: 20,
            penalties: ISA_TABLE,
        }
    }

    /// 12 wave slots, interference codes 0..=2.
    pub fn classic() -> Self {
        RuleSet {
            name: "classic",
            wave_capacity: 12,
            penalties: CLASSIC_TABLE,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "isa" => Some(Self::isa()),
            "classic" => Some(Self::classic()),
            _ => None,
        }
    }

    pub fn code_count(&self) -> u8 {
        self.penalties.len() as u8
    }

    /// Codes are validated on entry; anything unknown scores as no penalty.
    pub fn penalty(&self, code: u8) -> &Penalty {
        self.penalties.get(code as usize).unwrap_or(&NONE)
    }

    pub fn next_code(&self, code: u8) -> u8 {
        (code + 1) % self.code_count()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::isa()
    }
}
