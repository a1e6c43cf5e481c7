//! [`Client`] definitions.

use std::fmt;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, DateTimeOf, Percent};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credit applicant tracked by the system.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Client {
    /// ID of this [`Client`].
    pub id: Id,

    /// [`Name`] of this [`Client`].
    pub name: Name,

    /// [`Company`] this [`Client`] represents.
    pub company: Company,

    /// [`CreditAmount`] approved for this [`Client`].
    pub credit_amount: CreditAmount,

    /// [`Term`] of the credit.
    pub term: Term,

    /// Approval [`Status`] of the credit.
    pub status: Status,

    /// [`DateTime`] when this [`Client`] was created.
    pub created_at: CreationDateTime,

    /// [`Commission`] derived from the [`CreditAmount`] and [`Status`].
    pub commission: Commission,

    /// Indicator whether the [`Commission`] has been collected.
    pub commission_paid: bool,
}

impl Client {
    /// Creates a new [`Client`] out of the validated
    /// [`Details`].
    #[must_use]
    pub fn new(details: Details, created_at: CreationDateTime) -> Self {
        let Details {
            name,
            company,
            credit_amount,
            term,
            status,
        } = details;
        Self {
            id: Id::new(),
            name,
            company,
            credit_amount,
            term,
            status,
            created_at,
            commission: Commission::calculate(status, credit_amount),
            commission_paid: false,
        }
    }

    /// Replaces the mutable fields of this [`Client`] with the provided
    /// [`Details`], recalculating its [`Commission`].
    ///
    /// # Errors
    ///
    /// If the [`Status`] change is not a legal [`Status`] transition.
    pub fn apply(&mut self, details: Details) -> Result<(), InvalidTransition> {
        let Details {
            name,
            company,
            credit_amount,
            term,
            status,
        } = details;

        if status != self.status && !self.status.can_transition_to(status) {
            return Err(InvalidTransition {
                from: self.status,
                to: status,
            });
        }

        self.name = name;
        self.company = company;
        self.credit_amount = credit_amount;
        self.term = term;
        self.status = status;
        self.recalculate_commission();
        Ok(())
    }

    /// Moves this [`Client`] into the provided [`Status`], recalculating its
    /// [`Commission`].
    ///
    /// # Errors
    ///
    /// If this [`Client`] is not [`Status::Pending`] anymore, or the provided
    /// [`Status`] is [`Status::Pending`].
    pub fn transition(&mut self, to: Status) -> Result<(), InvalidTransition> {
        if !self.status.can_transition_to(to) {
            return Err(InvalidTransition {
                from: self.status,
                to,
            });
        }

        self.status = to;
        self.recalculate_commission();
        Ok(())
    }

    /// Indicates whether the [`Commission`] of this [`Client`] can be
    /// collected, meaning it's approved and not collected yet.
    #[must_use]
    pub fn is_commission_payable(&self) -> bool {
        self.status == Status::Approved && !self.commission_paid
    }

    /// Recalculates the [`Commission`] of this [`Client`].
    fn recalculate_commission(&mut self) {
        self.commission =
            Commission::calculate(self.status, self.credit_amount);
    }
}

/// ID of a [`Client`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
#[serde(transparent)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Maximum length of a [`Name`] or a [`Company`].
const MAX_TEXT_LEN: usize = 512;

/// Checks whether the provided `text` is a valid [`Name`] or [`Company`].
fn check_text(text: &str) -> bool {
    text.trim() == text
        && !text.is_empty()
        && text.chars().count() <= MAX_TEXT_LEN
}

/// Name of a [`Client`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` is trimmed and not empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        check_text(&name).then_some(Self(name))
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Company a [`Client`] represents.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, Into, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Company(String);

impl Company {
    /// Creates a new [`Company`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `company` is trimmed and not
    /// empty.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(company: impl Into<String>) -> Self {
        Self(company.into())
    }

    /// Creates a new [`Company`] if the given `company` is valid.
    #[must_use]
    pub fn new(company: impl Into<String>) -> Option<Self> {
        let company = company.into();
        check_text(&company).then_some(Self(company))
    }
}

impl FromStr for Company {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Company`")
    }
}

/// Non-negative amount of credit approved for a [`Client`].
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct CreditAmount(Decimal);

impl CreditAmount {
    /// Zero [`CreditAmount`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`CreditAmount`] if the given `amount` is not negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO).then_some(Self(amount.normalize()))
    }

    /// Returns the underlying [`Decimal`] amount.
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }

    /// Indicates whether this [`CreditAmount`] is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

/// Commission fee derived from the [`CreditAmount`] of a [`Client`].
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Commission(Decimal);

impl Commission {
    /// [`Percent`] of the [`CreditAmount`] taken as a [`Commission`].
    #[expect(unsafe_code, reason = "constant in range")]
    pub const RATE: Percent = unsafe { Percent::new_unchecked(Decimal::TWO) };

    /// Zero [`Commission`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Calculates the [`Commission`] for the provided [`Status`] and
    /// [`CreditAmount`].
    ///
    /// Rejected credits bring no [`Commission`], otherwise it's the
    /// [`Commission::RATE`] of the [`CreditAmount`] rounded to cents, with
    /// midpoints rounded away from zero.
    #[must_use]
    pub fn calculate(status: Status, amount: CreditAmount) -> Self {
        if status == Status::Rejected {
            return Self::ZERO;
        }
        let commission = Self::RATE.of(amount.get()).round_dp_with_strategy(
            2,
            RoundingStrategy::MidpointAwayFromZero,
        );
        Self(commission.normalize())
    }

    /// Returns the underlying [`Decimal`] amount.
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }
}

define_kind! {
    #[doc = "Approval status of a [`Client`]'s credit."]
    enum Status {
        #[doc = "Credit awaits a decision."]
        Pending = 1,

        #[doc = "Credit is approved."]
        Approved = 2,

        #[doc = "Credit is rejected."]
        Rejected = 3,
    }
}

impl Status {
    /// Indicates whether a decision has been made, so no further transitions
    /// are possible.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Indicates whether this [`Status`] can be changed to the provided one.
    ///
    /// Only [`Status::Pending`] can move, and only to a decided [`Status`].
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        !self.is_decided() && to.is_decided()
    }
}

define_kind! {
    #[doc = "Duration of a [`Client`]'s credit."]
    enum Term {
        #[doc = "6 months."]
        Months6 = 6,

        #[doc = "12 months."]
        Months12 = 12,

        #[doc = "18 months."]
        Months18 = 18,

        #[doc = "24 months."]
        Months24 = 24,

        #[doc = "30 months."]
        Months30 = 30,
    }
}

impl Term {
    /// Creates a [`Term`] out of the provided number of `months`, if it's one
    /// of the supported ones.
    #[must_use]
    pub fn from_months(months: i32) -> Option<Self> {
        u8::try_from(months).ok().and_then(|m| Self::try_from(m).ok())
    }

    /// Returns the number of months in this [`Term`].
    #[must_use]
    pub const fn months(self) -> u8 {
        self.u8()
    }
}

/// Transition between [`Status`]es which is not allowed.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("cannot move `Client` from `{from}` to `{to}` status")]
pub struct InvalidTransition {
    /// [`Status`] the transition was attempted from.
    pub from: Status,

    /// [`Status`] the transition was attempted to.
    pub to: Status,
}

/// Unvalidated mutable fields of a [`Client`], as provided by a caller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Draft {
    /// Name of a [`Client`].
    pub name: String,

    /// Company of a [`Client`].
    pub company: String,

    /// Credit amount of a [`Client`].
    pub credit_amount: Decimal,

    /// Credit term of a [`Client`], in months.
    pub term_months: i32,

    /// [`Status`] of a [`Client`].
    pub status: Status,
}

impl Draft {
    /// Validates this [`Draft`], trimming its texts.
    ///
    /// # Errors
    ///
    /// With all the [`Violation`]s found, if any.
    pub fn validate(self) -> Result<Details, ValidationError> {
        let Self {
            name,
            company,
            credit_amount,
            term_months,
            status,
        } = self;

        let mut violations = vec![];

        let name = Name::new(name.trim());
        if name.is_none() {
            violations.push(Violation::InvalidName);
        }
        let company = Company::new(company.trim());
        if company.is_none() {
            violations.push(Violation::InvalidCompany);
        }
        let credit_amount = CreditAmount::new(credit_amount);
        match credit_amount {
            None => violations.push(Violation::NegativeCreditAmount),
            Some(amount) if amount.is_zero() && status.is_decided() => {
                violations.push(Violation::ZeroCreditAmount(status));
            }
            Some(_) => {}
        }
        let term = Term::from_months(term_months);
        if term.is_none() {
            violations.push(Violation::UnsupportedTerm(term_months));
        }

        match (name, company, credit_amount, term) {
            (Some(name), Some(company), Some(credit_amount), Some(term))
                if violations.is_empty() =>
            {
                Ok(Details {
                    name,
                    company,
                    credit_amount,
                    term,
                    status,
                })
            }
            _ => Err(ValidationError(violations)),
        }
    }
}

/// Validated mutable fields of a [`Client`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Details {
    /// [`Name`] of a [`Client`].
    pub name: Name,

    /// [`Company`] of a [`Client`].
    pub company: Company,

    /// [`CreditAmount`] of a [`Client`].
    pub credit_amount: CreditAmount,

    /// [`Term`] of a [`Client`].
    pub term: Term,

    /// [`Status`] of a [`Client`].
    pub status: Status,
}

impl From<&Client> for Details {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            company: client.company.clone(),
            credit_amount: client.credit_amount,
            term: client.term,
            status: client.status,
        }
    }
}

/// Error of validating a [`Draft`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub struct ValidationError(#[error(not(source))] Vec<Violation>);

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid `Client`")?;
        for (n, violation) in self.0.iter().enumerate() {
            let sep = if n == 0 { ": " } else { "; " };
            write!(f, "{sep}{violation}")?;
        }
        Ok(())
    }
}

impl ValidationError {
    /// Returns all the [`Violation`]s of this [`ValidationError`].
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }
}

impl From<Violation> for ValidationError {
    fn from(violation: Violation) -> Self {
        Self(vec![violation])
    }
}

/// Single field-level violation of a [`Draft`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Violation {
    /// Name is empty or too long.
    #[display("name must be non-empty and at most 512 characters long")]
    InvalidName,

    /// Company is empty or too long.
    #[display("company must be non-empty and at most 512 characters long")]
    InvalidCompany,

    /// Credit amount is negative.
    #[display("credit amount must not be negative")]
    NegativeCreditAmount,

    /// Credit amount is zero, while a decision has been made.
    #[display("credit amount must be positive for `{_0}` status")]
    ZeroCreditAmount(Status),

    /// Term is not one of the supported ones.
    #[display("term of {_0} months is not supported")]
    UnsupportedTerm(i32),
}

impl Violation {
    /// Returns the name of the field this [`Violation`] is about.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidName => "name",
            Self::InvalidCompany => "company",
            Self::NegativeCreditAmount | Self::ZeroCreditAmount(_) => {
                "creditAmount"
            }
            Self::UnsupportedTerm(_) => "termMonths",
        }
    }
}

/// Portable representation of a [`Client`] used for bulk export and import.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// ID of a [`Client`].
    pub id: Id,

    /// Name of a [`Client`].
    pub name: String,

    /// Company of a [`Client`].
    pub company: String,

    /// Credit amount of a [`Client`].
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub credit_amount: Decimal,

    /// Credit term of a [`Client`], in months.
    pub term_months: i32,

    /// [`Status`] of a [`Client`].
    #[serde(with = "status_token")]
    pub status: Status,

    /// [`DateTime`] when a [`Client`] was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: CreationDateTime,

    /// [`Commission`] of a [`Client`].
    ///
    /// Ignored on import, as it's always derived.
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub commission: Decimal,

    /// Indicator whether the [`Commission`] has been collected.
    #[serde(default)]
    pub commission_paid: bool,
}

impl Record {
    /// Converts this [`Record`] into a [`Client`], validating its fields and
    /// deriving its [`Commission`].
    ///
    /// # Errors
    ///
    /// With all the [`Violation`]s found, if any.
    pub fn into_client(self) -> Result<Client, ValidationError> {
        let Self {
            id,
            name,
            company,
            credit_amount,
            term_months,
            status,
            created_at,
            commission: _,
            commission_paid,
        } = self;

        let Details {
            name,
            company,
            credit_amount,
            term,
            status,
        } = Draft {
            name,
            company,
            credit_amount,
            term_months,
            status,
        }
        .validate()?;

        Ok(Client {
            id,
            name,
            company,
            credit_amount,
            term,
            status,
            created_at,
            commission: Commission::calculate(status, credit_amount),
            commission_paid,
        })
    }
}

impl From<Client> for Record {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name.into(),
            company: client.company.into(),
            credit_amount: client.credit_amount.get(),
            term_months: client.term.months().into(),
            status: client.status,
            created_at: client.created_at,
            commission: client.commission.get(),
            commission_paid: client.commission_paid,
        }
    }
}

mod status_token {
    //! [`Status`] (de)serialization as its string token.

    use serde::{de::Error as _, Deserialize as _, Deserializer, Serializer};

    use super::Status;

    /// Serializes the [`Status`] as its token.
    pub(super) fn serialize<S: Serializer>(
        status: &Status,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(status)
    }

    /// Deserializes the [`Status`] from its token.
    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Status, D::Error> {
        let token = String::deserialize(deserializer)?;
        token
            .parse()
            .map_err(|_| D::Error::custom(format!("unknown status `{token}`")))
    }
}

/// Marker of a [`Client`] creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// [`DateTime`] when a [`Client`] was created.
pub type CreationDateTime = DateTimeOf<(Client, Creation)>;

#[cfg(test)]
mod spec {
    use rstest::rstest;
    use rust_decimal::Decimal;
    use strum::IntoEnumIterator as _;

    use super::{
        Client, Commission, CreationDateTime, CreditAmount, Draft, Record,
        Status, Term, Violation,
    };

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn amount(s: &str) -> CreditAmount {
        CreditAmount::new(decimal(s)).unwrap()
    }

    fn draft(amount: &str, status: Status) -> Draft {
        Draft {
            name: "Ana Torres".into(),
            company: "Torres SA".into(),
            credit_amount: decimal(amount),
            term_months: 12,
            status,
        }
    }

    #[rstest]
    #[case("1000", "20")]
    #[case("0", "0")]
    #[case("1234.56", "24.69")]
    #[case("0.25", "0.01")]
    #[case("0.75", "0.02")]
    #[case("999999.99", "20000")]
    fn commission_is_two_percent_rounded_to_cents(
        #[case] credit: &str,
        #[case] expected: &str,
    ) {
        for status in [Status::Pending, Status::Approved] {
            assert_eq!(
                Commission::calculate(status, amount(credit)).get(),
                decimal(expected),
            );
        }
    }

    #[rstest]
    #[case("0")]
    #[case("1")]
    #[case("1000")]
    #[case("123456.78")]
    fn commission_is_zero_only_when_rejected(#[case] credit: &str) {
        for status in Status::iter() {
            let commission = Commission::calculate(status, amount(credit));
            if status == Status::Rejected || amount(credit).is_zero() {
                assert_eq!(commission, Commission::ZERO);
            } else {
                assert_ne!(commission, Commission::ZERO);
            }
        }
    }

    #[test]
    fn only_pending_moves_to_decision() {
        for from in Status::iter() {
            for to in Status::iter() {
                assert_eq!(
                    from.can_transition_to(to),
                    from == Status::Pending && to != Status::Pending,
                    "{from} -> {to}",
                );
            }
        }
    }

    #[test]
    fn transition_recalculates_commission() {
        let details = draft("1000", Status::Pending).validate().unwrap();
        let mut client = Client::new(details, CreationDateTime::now());
        assert_eq!(client.commission.get(), decimal("20"));

        client.transition(Status::Rejected).unwrap();

        assert_eq!(client.status, Status::Rejected);
        assert_eq!(client.commission, Commission::ZERO);
        assert!(client.transition(Status::Approved).is_err());
        assert!(client.transition(Status::Rejected).is_err());
    }

    #[test]
    fn apply_refuses_reverting_decision() {
        let details = draft("1000", Status::Approved).validate().unwrap();
        let mut client = Client::new(details, CreationDateTime::now());

        let err = client
            .apply(draft("1000", Status::Pending).validate().unwrap())
            .unwrap_err();

        assert_eq!(err.from, Status::Approved);
        assert_eq!(err.to, Status::Pending);
        assert_eq!(client.status, Status::Approved);
    }

    #[test]
    fn apply_recalculates_commission() {
        let details = draft("1000", Status::Pending).validate().unwrap();
        let mut client = Client::new(details, CreationDateTime::now());

        client
            .apply(draft("2500", Status::Approved).validate().unwrap())
            .unwrap();

        assert_eq!(client.commission.get(), decimal("50"));
        assert_eq!(client.credit_amount, amount("2500"));
    }

    #[test]
    fn trims_texts() {
        let details = Draft {
            name: "  Ana ".into(),
            company: "\tTorres SA\n".into(),
            ..draft("10", Status::Pending)
        }
        .validate()
        .unwrap();

        assert_eq!(AsRef::<str>::as_ref(&details.name), "Ana");
        assert_eq!(AsRef::<str>::as_ref(&details.company), "Torres SA");
    }

    #[test]
    fn collects_all_violations() {
        let err = Draft {
            name: "   ".into(),
            company: String::new(),
            credit_amount: decimal("0"),
            term_months: 7,
            status: Status::Approved,
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            err.violations(),
            [
                Violation::InvalidName,
                Violation::InvalidCompany,
                Violation::ZeroCreditAmount(Status::Approved),
                Violation::UnsupportedTerm(7),
            ],
        );
        assert_eq!(
            err.violations().iter().map(Violation::field).collect::<Vec<_>>(),
            ["name", "company", "creditAmount", "termMonths"],
        );
    }

    #[rstest]
    #[case("0", Status::Pending, true)]
    #[case("0", Status::Approved, false)]
    #[case("0", Status::Rejected, false)]
    #[case("0.01", Status::Rejected, true)]
    #[case("-1", Status::Pending, false)]
    fn validates_credit_amount(
        #[case] credit: &str,
        #[case] status: Status,
        #[case] valid: bool,
    ) {
        assert_eq!(draft(credit, status).validate().is_ok(), valid);
    }

    #[rstest]
    #[case(6, Some(Term::Months6))]
    #[case(12, Some(Term::Months12))]
    #[case(18, Some(Term::Months18))]
    #[case(24, Some(Term::Months24))]
    #[case(30, Some(Term::Months30))]
    #[case(0, None)]
    #[case(36, None)]
    #[case(-6, None)]
    #[case(262, None)]
    fn accepts_only_supported_terms(
        #[case] months: i32,
        #[case] expected: Option<Term>,
    ) {
        assert_eq!(Term::from_months(months), expected);
    }

    #[test]
    fn record_derives_commission() {
        let record: Record = serde_json::from_value(serde_json::json!({
            "id": "6f1c1d44-8d5e-4a4e-9d0b-0f6a3c1b2d3e",
            "name": "Ana",
            "company": "Torres SA",
            "creditAmount": 1500,
            "termMonths": 18,
            "status": "APPROVED",
            "createdAt": "2024-05-02T10:00:00Z",
            "commission": 999,
            "commissionPaid": true,
        }))
        .unwrap();

        let client = record.into_client().unwrap();

        assert_eq!(client.commission.get(), decimal("30"));
        assert_eq!(client.term, Term::Months18);
        assert!(client.commission_paid);
    }

    #[test]
    fn record_keeps_wire_shape() {
        let details = draft("1000.5", Status::Approved).validate().unwrap();
        let client = Client::new(
            details,
            CreationDateTime::from_rfc3339("2024-05-02T10:00:00Z").unwrap(),
        );

        let json = serde_json::to_value(Record::from(client.clone())).unwrap();

        assert_eq!(json["creditAmount"], serde_json::json!(1000.5));
        assert_eq!(json["termMonths"], serde_json::json!(12));
        assert_eq!(json["status"], serde_json::json!("APPROVED"));
        assert_eq!(
            json["createdAt"],
            serde_json::json!("2024-05-02T10:00:00Z"),
        );
        assert_eq!(json["commission"], serde_json::json!(20.01));
        assert_eq!(json["commissionPaid"], serde_json::json!(false));
        assert_eq!(json["id"], serde_json::json!(client.id.to_string()));
    }

    #[test]
    fn record_rejects_unknown_status() {
        let res = serde_json::from_value::<Record>(serde_json::json!({
            "id": "6f1c1d44-8d5e-4a4e-9d0b-0f6a3c1b2d3e",
            "name": "Ana",
            "company": "Torres SA",
            "creditAmount": 1500,
            "termMonths": 18,
            "status": "ARCHIVED",
            "createdAt": "2024-05-02T10:00:00Z",
        }));

        assert!(res.is_err());
    }
}
