//! Collection of public constants for the ledger.

/// Length of an account id.
pub const ACCOUNT_ID_LENGTH: usize = 20;

/// Length of a currency code.
pub const CURRENCY_CODE_LENGTH: usize = 20;

/// Drops per XRP.
pub const DROPS_PER_XRP: u64 = 1_000_000;

/// The neutral quality and transfer-rate unit: parts per billion.
pub const QUALITY_ONE: u32 = 1_000_000_000;

/// Maximum number of indexes held by one directory page.
pub const DIR_NODE_MAX: usize = 32;

/// Maximum number of tokens held by one NFToken page.
pub const NFTOKEN_PAGE_MAX: usize = 32;

/// Maximum offers consumed by a single book step, and by a strand overall.
/// Beyond this the step is marked inactive to bound per-transaction work.
pub const MAX_OFFERS_CONSUMED: usize = 1000;

/// Maximum entries in a signer list.
pub const SIGNER_LIST_MAX: usize = 32;

/// Maximum tickets created by a single TicketCreate.
pub const TICKET_BATCH_MAX: u32 = 250;

/// An account must have been alive this many sequence numbers before it can
/// be deleted (relaxed in standalone mode).
pub const ACCOUNT_DELETE_SEQUENCE_GAP: u32 = 256;

/// Largest valid NFToken transfer fee, in units of 1/100_000.
pub const NFTOKEN_MAX_TRANSFER_FEE: u16 = 50_000;

/// Taxon cipher constants for NFToken ids. The sequence is mixed into the
/// taxon with a linear congruential permutation so that tokens of one taxon
/// spread across pages.
pub const NFTOKEN_TAXON_C1: u32 = 384_160_001;
pub const NFTOKEN_TAXON_C2: u32 = 2_357_503_715;

/// IOU mantissa bounds: values normalize to 15-16 significant digits.
pub const IOU_MAX_DIGITS: u64 = 16;

/// Smallest representable IOU exponent; values whose canonical exponent
/// would fall below it collapse to zero.
pub const IOU_MIN_EXPONENT: i64 = -96;

/// Largest representable IOU exponent.
pub const IOU_MAX_EXPONENT: i64 = 80;
