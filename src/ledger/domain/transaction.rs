//! Unsigned transactions, their identifiers and atomic groups.

use super::{
    Address, AppId, LedgerDomainError, MicroAlgos, SuggestedParams, base32,
    hash::sha512_256,
    msgpack::{Field, encode_map},
};
use std::fmt;

/// Largest number of transactions the ledger accepts in one atomic group.
pub const MAX_GROUP_SIZE: usize = 16;

const TRANSACTION_TAG: &[u8] = b"TX";
const GROUP_TAG: &[u8] = b"TG";

/// Identifier of a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId([u8; 32]);

impl TransactionId {
    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base32::encode(&self.0))
    }
}

/// Identifier binding the members of an atomic transaction group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId([u8; 32]);

impl GroupId {
    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base32::encode(&self.0))
    }
}

/// Type-specific body of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    /// Transfer of native currency.
    Payment {
        /// Recipient of the transfer.
        receiver: Address,
        /// Transferred amount.
        amount: MicroAlgos,
    },
    /// No-op call into an application with ordered byte-string arguments.
    AppCall {
        /// Called application.
        app_id: AppId,
        /// Call arguments, carried as discrete byte strings.
        args: Vec<Vec<u8>>,
    },
}

/// A transaction ready to be handed to a signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    sender: Address,
    fee: MicroAlgos,
    first_valid: u64,
    last_valid: u64,
    genesis_id: String,
    genesis_hash: [u8; 32],
    group: Option<GroupId>,
    note: Vec<u8>,
    kind: TransactionKind,
}

impl UnsignedTransaction {
    /// Builds a payment transaction.
    #[must_use]
    pub fn payment(
        sender: Address,
        receiver: Address,
        amount: MicroAlgos,
        params: &SuggestedParams,
    ) -> Self {
        Self::with_params(sender, TransactionKind::Payment { receiver, amount }, params)
    }

    /// Builds a no-op application call transaction.
    #[must_use]
    pub fn app_call(
        sender: Address,
        app_id: AppId,
        args: Vec<Vec<u8>>,
        params: &SuggestedParams,
    ) -> Self {
        Self::with_params(sender, TransactionKind::AppCall { app_id, args }, params)
    }

    fn with_params(sender: Address, kind: TransactionKind, params: &SuggestedParams) -> Self {
        let mut transaction = Self {
            sender,
            fee: MicroAlgos::default(),
            first_valid: params.first_valid,
            last_valid: params.last_valid,
            genesis_id: params.genesis_id.clone(),
            genesis_hash: params.genesis_hash,
            group: None,
            note: Vec::new(),
            kind,
        };
        transaction.fee = params.fee_for(transaction.encode().len());
        transaction
    }

    /// Returns the sending address.
    #[must_use]
    pub const fn sender(&self) -> Address {
        self.sender
    }

    /// Returns the fee paid by the sender.
    #[must_use]
    pub const fn fee(&self) -> MicroAlgos {
        self.fee
    }

    /// Returns the first round the transaction is valid in.
    #[must_use]
    pub const fn first_valid(&self) -> u64 {
        self.first_valid
    }

    /// Returns the last round the transaction is valid in.
    #[must_use]
    pub const fn last_valid(&self) -> u64 {
        self.last_valid
    }

    /// Returns the network identifier.
    #[must_use]
    pub fn genesis_id(&self) -> &str {
        &self.genesis_id
    }

    /// Returns the atomic group this transaction belongs to, if any.
    #[must_use]
    pub const fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Returns the note bytes, empty when none was attached.
    #[must_use]
    pub fn note(&self) -> &[u8] {
        &self.note
    }

    /// Returns the type-specific body.
    #[must_use]
    pub const fn kind(&self) -> &TransactionKind {
        &self.kind
    }

    /// Returns the call arguments for application calls.
    #[must_use]
    pub fn app_args(&self) -> Option<&[Vec<u8>]> {
        match &self.kind {
            TransactionKind::AppCall { args, .. } => Some(args),
            TransactionKind::Payment { .. } => None,
        }
    }

    /// Attaches an arbitrary note and recomputes the fee for the new size.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<Vec<u8>>, params: &SuggestedParams) -> Self {
        self.note = note.into();
        self.fee = MicroAlgos::default();
        self.fee = params.fee_for(self.encode().len());
        self
    }

    /// Encodes the transaction in canonical form.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut fields = vec![
            ("fee", Field::Uint(self.fee.value())),
            ("fv", Field::Uint(self.first_valid)),
            ("gen", Field::Str(&self.genesis_id)),
            ("gh", Field::Bin(&self.genesis_hash)),
            ("lv", Field::Uint(self.last_valid)),
            ("snd", Field::Bin(self.sender.as_bytes())),
        ];
        if let Some(group) = &self.group {
            fields.push(("grp", Field::Bin(&group.0)));
        }
        fields.push(("note", Field::Bytes(&self.note)));
        match &self.kind {
            TransactionKind::Payment { receiver, amount } => {
                fields.push(("type", Field::Str("pay")));
                fields.push(("rcv", Field::Bin(receiver.as_bytes())));
                fields.push(("amt", Field::Uint(amount.value())));
            }
            TransactionKind::AppCall { app_id, args } => {
                fields.push(("type", Field::Str("appl")));
                fields.push(("apid", Field::Uint(app_id.value())));
                fields.push(("apaa", Field::BinArray(args)));
            }
        }
        encode_map(&fields)
    }

    /// Computes the transaction identifier.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        TransactionId(sha512_256(TRANSACTION_TAG, &self.encode()))
    }
}

/// Transactions that the ledger commits or rejects as a single unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionGroup {
    id: GroupId,
    transactions: Vec<UnsignedTransaction>,
}

impl TransactionGroup {
    /// Computes the group identifier and stamps it on every member.
    ///
    /// Any group previously assigned to a member is discarded first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::EmptyGroup`] or
    /// [`LedgerDomainError::GroupTooLarge`] when the member count is outside
    /// `1..=MAX_GROUP_SIZE`.
    pub fn new(mut transactions: Vec<UnsignedTransaction>) -> Result<Self, LedgerDomainError> {
        if transactions.is_empty() {
            return Err(LedgerDomainError::EmptyGroup);
        }
        if transactions.len() > MAX_GROUP_SIZE {
            return Err(LedgerDomainError::GroupTooLarge(transactions.len()));
        }

        let member_ids: Vec<Vec<u8>> = transactions
            .iter_mut()
            .map(|transaction| {
                transaction.group = None;
                transaction.id().as_bytes().to_vec()
            })
            .collect();
        let id = GroupId(sha512_256(
            GROUP_TAG,
            &encode_map(&[("txlist", Field::BinArray(&member_ids))]),
        ));
        for transaction in &mut transactions {
            transaction.group = Some(id);
        }

        Ok(Self { id, transactions })
    }

    /// Returns the group identifier.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the members in submission order.
    #[must_use]
    pub fn transactions(&self) -> &[UnsignedTransaction] {
        &self.transactions
    }

    /// Consumes the group, returning its members in submission order.
    #[must_use]
    pub fn into_transactions(self) -> Vec<UnsignedTransaction> {
        self.transactions
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Always `false`: groups are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
