//! [`Client`] read model definitions.
//!
//! [`Client`]: crate::domain::Client

pub mod list {
    //! [`Client`]s list definitions.

    use std::ops::RangeInclusive;

    use common::define_pagination;

    use crate::domain::{
        client::{CreationDateTime, Status},
        Client,
    };

    define_pagination!(Client, Filter);

    /// [`Status`] a [`Client`] should have to be listed.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub enum StatusFilter {
        /// Any [`Status`].
        #[default]
        All,

        /// [`Status::Approved`] only.
        Approved,

        /// [`Status::Rejected`] only.
        Rejected,

        /// [`Status::Pending`] only.
        Pending,
    }

    impl StatusFilter {
        /// Checks whether the provided [`Status`] passes this
        /// [`StatusFilter`].
        #[must_use]
        pub fn matches(self, status: Status) -> bool {
            match self {
                Self::All => true,
                Self::Approved => status == Status::Approved,
                Self::Rejected => status == Status::Rejected,
                Self::Pending => status == Status::Pending,
            }
        }
    }

    impl From<Status> for StatusFilter {
        fn from(status: Status) -> Self {
            match status {
                Status::Pending => Self::Pending,
                Status::Approved => Self::Approved,
                Status::Rejected => Self::Rejected,
            }
        }
    }

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    pub struct Filter {
        /// [`StatusFilter`] to apply.
        pub status: StatusFilter,

        /// Text to search for in a [`Client`]'s name or company,
        /// case-insensitively.
        pub search: Option<String>,

        /// Inclusive range the [`CreationDateTime`] of a [`Client`] should
        /// fall into.
        pub created: Option<RangeInclusive<CreationDateTime>>,
    }

    impl Filter {
        /// Checks whether the provided [`Client`] passes this [`Filter`].
        #[must_use]
        pub fn matches(&self, client: &Client) -> bool {
            self.status.matches(client.status)
                && self.search.as_deref().map_or(true, |text| {
                    let text = text.to_lowercase();
                    let name: &str = client.name.as_ref();
                    let company: &str = client.company.as_ref();
                    name.to_lowercase().contains(&text)
                        || company.to_lowercase().contains(&text)
                })
                && self
                    .created
                    .as_ref()
                    .map_or(true, |range| range.contains(&client.created_at))
        }

        /// Returns the [`Client`]s passing this [`Filter`], in their original
        /// order.
        #[must_use]
        pub fn apply<'c, I>(&self, clients: I) -> Vec<&'c Client>
        where
            I: IntoIterator<Item = &'c Client>,
        {
            clients.into_iter().filter(|c| self.matches(c)).collect()
        }
    }
}

pub mod summary {
    //! Aggregated statistics over [`Client`]s.

    use common::YearMonth;
    use rust_decimal::Decimal;

    use crate::domain::{client::Status, Client};

    /// Statistics of the [`Client`]s created in a single month.
    ///
    /// Rejected [`Client`]s are only counted in
    /// [`Monthly::rejected_clients`], all the rest are considered active.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Monthly {
        /// Month these statistics are about.
        pub month: YearMonth,

        /// Number of active [`Client`]s.
        pub total_clients: usize,

        /// Sum of the credit amounts of active [`Client`]s.
        pub total_credit_granted: Decimal,

        /// Sum of the commissions of active [`Client`]s.
        pub total_commission_generated: Decimal,

        /// Number of approved [`Client`]s.
        pub active_credits: usize,

        /// Number of approved [`Client`]s.
        ///
        /// Equals to [`Monthly::active_credits`] at the moment, but is
        /// reported on its own.
        pub authorized_clients: usize,

        /// Number of rejected [`Client`]s.
        pub rejected_clients: usize,

        /// Active [`Client`] with the largest credit amount, the earliest
        /// listed one on ties.
        pub max_credit_client: Option<Client>,
    }

    impl Monthly {
        /// Computes [`Monthly`] statistics of the provided [`Client`]s for
        /// the provided `month`.
        #[must_use]
        pub fn compute(clients: &[Client], month: YearMonth) -> Self {
            let mut summary = Self {
                month,
                total_clients: 0,
                total_credit_granted: Decimal::ZERO,
                total_commission_generated: Decimal::ZERO,
                active_credits: 0,
                authorized_clients: 0,
                rejected_clients: 0,
                max_credit_client: None,
            };
            let mut max: Option<&Client> = None;

            let created_in_month =
                clients.iter().filter(|c| month.contains(&c.created_at));
            for client in created_in_month {
                if client.status == Status::Rejected {
                    summary.rejected_clients += 1;
                    continue;
                }

                summary.total_clients += 1;
                summary.total_credit_granted += client.credit_amount.get();
                summary.total_commission_generated +=
                    client.commission.get();
                if client.status == Status::Approved {
                    summary.active_credits += 1;
                    summary.authorized_clients += 1;
                }
                if max
                    .map_or(true, |m| client.credit_amount > m.credit_amount)
                {
                    max = Some(client);
                }
            }

            summary.max_credit_client = max.cloned();
            summary
        }
    }

    /// Summary of the commissions over all the [`Client`]s.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct Commissions {
        /// Sum of the commissions awaiting collection.
        pub pending_total: Decimal,

        /// Number of [`Client`]s with a commission awaiting collection.
        pub pending_count: usize,

        /// Sum of the already collected commissions.
        pub paid_total: Decimal,
    }

    impl Commissions {
        /// Computes [`Commissions`] of the provided [`Client`]s.
        ///
        /// A commission awaits collection when its [`Client`] is approved and
        /// it's not collected yet.
        #[must_use]
        pub fn compute(clients: &[Client]) -> Self {
            clients.iter().fold(
                Self {
                    pending_total: Decimal::ZERO,
                    pending_count: 0,
                    paid_total: Decimal::ZERO,
                },
                |mut acc, client| {
                    if client.is_commission_payable() {
                        acc.pending_total += client.commission.get();
                        acc.pending_count += 1;
                    } else if client.commission_paid {
                        acc.paid_total += client.commission.get();
                    }
                    acc
                },
            )
        }
    }
}

pub mod export {
    //! Tabular export of [`Client`]s.

    use rust_decimal::{Decimal, RoundingStrategy};

    use crate::domain::Client;

    /// Single row of the exported table, with every cell rendered as text.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Row {
        /// Name of the [`Client`].
        pub name: String,

        /// Company of the [`Client`].
        pub company: String,

        /// Credit amount, with two decimals.
        pub credit_amount: String,

        /// Status token.
        pub status: String,

        /// Creation date, as `YYYY-MM-DD`.
        pub created_at: String,

        /// Commission, with two decimals.
        pub commission: String,

        /// `Yes` if the commission is collected, `No` otherwise.
        pub commission_paid: String,
    }

    impl Row {
        /// Titles of the exported columns.
        pub const HEADER: [&'static str; 7] = [
            "Name",
            "Company",
            "Credit Amount",
            "Status",
            "Created At",
            "Commission",
            "Commission Paid",
        ];

        /// Returns the cells of this [`Row`] in the [`Row::HEADER`] order.
        #[must_use]
        pub fn cells(&self) -> [&str; 7] {
            [
                &self.name,
                &self.company,
                &self.credit_amount,
                &self.status,
                &self.created_at,
                &self.commission,
                &self.commission_paid,
            ]
        }
    }

    impl From<&Client> for Row {
        fn from(client: &Client) -> Self {
            Self {
                name: client.name.to_string(),
                company: client.company.to_string(),
                credit_amount: money(client.credit_amount.get()),
                status: client.status.to_string(),
                created_at: client.created_at.to_date_string(),
                commission: money(client.commission.get()),
                commission_paid: if client.commission_paid {
                    "Yes"
                } else {
                    "No"
                }
                .to_owned(),
            }
        }
    }

    /// Renders the provided `amount` with exactly two decimals.
    fn money(amount: Decimal) -> String {
        let amount = amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{amount:.2}")
    }
}

#[cfg(test)]
mod spec {
    use std::ops::RangeInclusive;

    use common::YearMonth;
    use rstest::rstest;
    use rust_decimal::Decimal;

    use crate::domain::{
        client::{CreationDateTime, Draft, Status},
        Client,
    };

    use super::{
        export::Row,
        list::{Arguments, Filter, StatusFilter},
        summary::{Commissions, Monthly},
    };

    fn client(
        name: &str,
        company: &str,
        amount: i64,
        status: Status,
        created_at: &str,
    ) -> Client {
        let details = Draft {
            name: name.into(),
            company: company.into(),
            credit_amount: amount.into(),
            term_months: 12,
            status,
        }
        .validate()
        .unwrap();
        let created_at = CreationDateTime::from_rfc3339(created_at).unwrap();
        Client::new(details, created_at)
    }

    fn fixture() -> Vec<Client> {
        use Status as S;

        vec![
            client(
                "Ana",
                "Torres SA",
                1000,
                S::Approved,
                "2024-05-02T10:00:00Z",
            ),
            client("Luis", "Acme", 500, S::Rejected, "2024-05-10T10:00:00Z"),
            client(
                "Marta",
                "Banco Sur",
                2000,
                S::Pending,
                "2024-05-31T23:59:59Z",
            ),
            client(
                "Pedro",
                "acme labs",
                3000,
                S::Approved,
                "2024-06-01T00:00:00Z",
            ),
            client("Sofía", "Norte", 750, S::Pending, "2024-04-30T12:00:00Z"),
        ]
    }

    fn names(clients: &[&Client]) -> Vec<String> {
        clients.iter().map(|c| c.name.to_string()).collect()
    }

    fn range(from: &str, to: &str) -> RangeInclusive<CreationDateTime> {
        CreationDateTime::from_rfc3339(from).unwrap()
            ..=CreationDateTime::from_rfc3339(to).unwrap()
    }

    #[rstest]
    #[case(Filter::default(), &["Ana", "Luis", "Marta", "Pedro", "Sofía"])]
    #[case(
        Filter { status: StatusFilter::Approved, ..Filter::default() },
        &["Ana", "Pedro"],
    )]
    #[case(
        Filter { status: StatusFilter::Rejected, ..Filter::default() },
        &["Luis"],
    )]
    #[case(
        Filter { status: StatusFilter::Pending, ..Filter::default() },
        &["Marta", "Sofía"],
    )]
    #[case(
        Filter { search: Some("ACME".into()), ..Filter::default() },
        &["Luis", "Pedro"],
    )]
    #[case(
        Filter { search: Some("ar".into()), ..Filter::default() },
        &["Marta"],
    )]
    #[case(
        Filter { search: Some(String::new()), ..Filter::default() },
        &["Ana", "Luis", "Marta", "Pedro", "Sofía"],
    )]
    #[case(
        Filter {
            created: Some(range(
                "2024-05-10T10:00:00Z",
                "2024-06-01T00:00:00Z",
            )),
            ..Filter::default()
        },
        &["Luis", "Marta", "Pedro"],
    )]
    fn filters_in_original_order(
        #[case] filter: Filter,
        #[case] expected: &[&str],
    ) {
        let clients = fixture();

        assert_eq!(names(&filter.apply(&clients)), expected);
    }

    #[test]
    fn filters_compose() {
        let clients = fixture();
        let filters = [
            Filter { status: StatusFilter::Approved, ..Filter::default() },
            Filter { search: Some("a".into()), ..Filter::default() },
            Filter {
                created: Some(range(
                    "2024-05-01T00:00:00Z",
                    "2024-05-31T23:59:59Z",
                )),
                ..Filter::default()
            },
            Filter::default(),
        ];

        for a in &filters {
            for b in &filters {
                let nested = b.apply(a.apply(&clients));
                let combined = clients
                    .iter()
                    .filter(|c| a.matches(c) && b.matches(c))
                    .collect::<Vec<_>>();
                assert_eq!(nested, combined);
            }
        }
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(7)]
    fn pages_cover_filtered_list_once(#[case] per_page: usize) {
        let clients = fixture();
        let filtered = Filter::default().apply(&clients);
        let first = Arguments::new(None, Some(per_page), per_page)
            .unwrap()
            .paginate(filtered.iter().copied());

        let mut collected = vec![];
        for page in 1..=first.total_pages() {
            let page = Arguments::new(Some(page), Some(per_page), per_page)
                .unwrap()
                .paginate(filtered.iter().copied());
            collected.extend(page.items);
        }

        assert_eq!(collected, filtered);
    }

    #[test]
    fn computes_monthly_summary() {
        let clients = fixture();

        let month = YearMonth::new(2024, 5).unwrap();

        let summary = Monthly::compute(&clients, month);

        assert_eq!(summary.total_clients, 2);
        assert_eq!(summary.total_credit_granted, Decimal::from(3000));
        assert_eq!(summary.total_commission_generated, Decimal::from(60));
        assert_eq!(summary.active_credits, 1);
        assert_eq!(summary.authorized_clients, 1);
        assert_eq!(summary.rejected_clients, 1);
        assert_eq!(
            summary.max_credit_client.map(|c| c.name.to_string()),
            Some("Marta".into()),
        );
    }

    #[test]
    fn monthly_summary_of_empty_month() {
        let clients = fixture();

        let month = YearMonth::new(2023, 1).unwrap();

        let summary = Monthly::compute(&clients, month);

        assert_eq!(summary.total_clients, 0);
        assert_eq!(summary.total_credit_granted, Decimal::ZERO);
        assert_eq!(summary.rejected_clients, 0);
        assert_eq!(summary.max_credit_client, None);
    }

    #[test]
    fn max_credit_prefers_first_on_ties() {
        use Status as S;

        let clients = vec![
            client("First", "A", 100, S::Pending, "2024-01-05T00:00:00Z"),
            client("Second", "B", 100, S::Approved, "2024-01-06T00:00:00Z"),
            client("Rejected", "C", 900, S::Rejected, "2024-01-07T00:00:00Z"),
        ];
        let month = YearMonth::new(2024, 1).unwrap();

        let summary = Monthly::compute(&clients, month);

        assert_eq!(
            summary.max_credit_client.map(|c| c.name.to_string()),
            Some("First".into()),
        );
    }

    #[test]
    fn computes_commissions_summary() {
        let mut clients = fixture();
        clients[3].commission_paid = true;

        let summary = Commissions::compute(&clients);

        assert_eq!(summary.pending_count, 1);
        assert_eq!(summary.pending_total, Decimal::from(20));
        assert_eq!(summary.paid_total, Decimal::from(60));
    }

    #[test]
    fn renders_export_row() {
        let mut ana = client(
            "Ana",
            "Torres SA",
            1000,
            Status::Approved,
            "2024-05-02T10:00:00Z",
        );
        ana.commission_paid = true;

        let row = Row::from(&ana);

        assert_eq!(
            row.cells(),
            [
                "Ana",
                "Torres SA",
                "1000.00",
                "APPROVED",
                "2024-05-02",
                "20.00",
                "Yes",
            ],
        );
    }
}
