//! Abstractions for page-number pagination.

use std::num::NonZeroUsize;

/// Requested page of a list.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Arguments {
    /// 1-based number of the requested page.
    page: NonZeroUsize,

    /// Number of items on a single page.
    per_page: NonZeroUsize,
}

impl Arguments {
    /// Creates new [`Arguments`] out of the raw `page` number and `per_page`
    /// size, using the first page and the `default` size when omitted.
    ///
    /// [`None`] is returned if any of the values is not a positive integer.
    pub fn new<Num>(
        page: Option<Num>,
        per_page: Option<Num>,
        default: Num,
    ) -> Option<Self>
    where
        Num: TryInto<usize>,
    {
        let page = match page {
            Some(p) => NonZeroUsize::new(p.try_into().ok()?)?,
            None => NonZeroUsize::MIN,
        };
        let per_page =
            NonZeroUsize::new(per_page.unwrap_or(default).try_into().ok()?)?;
        Some(Self { page, per_page })
    }

    /// Returns 1-based number of the requested page.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page.get()
    }

    /// Returns the number of items on a single page.
    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page.get()
    }

    /// Returns the number of items preceding the requested page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page.get() - 1).saturating_mul(self.per_page.get())
    }

    /// Cuts the requested [`Page`] out of the provided `items`.
    ///
    /// Pages beyond the last one are empty.
    #[must_use]
    pub fn paginate<T>(&self, items: impl IntoIterator<Item = T>) -> Page<T> {
        let items = items.into_iter().collect::<Vec<_>>();
        let total_count = items.len();
        let items = items
            .into_iter()
            .skip(self.offset())
            .take(self.per_page())
            .collect();
        Page {
            items,
            number: self.page(),
            per_page: self.per_page(),
            total_count,
        }
    }
}

/// A single page of a list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<T> {
    /// Items on this [`Page`].
    pub items: Vec<T>,

    /// 1-based number of this [`Page`].
    pub number: usize,

    /// Maximum number of items on a single [`Page`].
    pub per_page: usize,

    /// Total number of items in all the [`Page`]s.
    pub total_count: usize,
}

impl<T> Page<T> {
    /// Returns the total number of [`Page`]s.
    ///
    /// An empty list has no [`Page`]s at all.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total_count.div_ceil(self.per_page)
    }

    /// Indicates whether there is a [`Page`] after this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.number < self.total_pages()
    }

    /// Indicates whether there is a [`Page`] before this one.
    #[must_use]
    pub const fn has_previous_page(&self) -> bool {
        self.number > 1
    }

    /// Maps the items of this [`Page`] keeping its position.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            total_count: self.total_count,
        }
    }
}

/// Pagination selector.
#[derive(Clone, Debug)]
pub struct Selector<F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Additional filter being applied before paginating.
    pub filter: F,
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty) => {
        #[doc = "A [`Page`] of [`$node`]s."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter>;
    };
}

#[cfg(test)]
mod spec {
    use rstest::rstest;

    use super::Arguments;

    #[rstest]
    #[case(None, None, Some((1, 20)))]
    #[case(Some(3), None, Some((3, 20)))]
    #[case(Some(2), Some(5), Some((2, 5)))]
    #[case(Some(0), None, None)]
    #[case(None, Some(0), None)]
    #[case(Some(-1), None, None)]
    #[case(None, Some(-5), None)]
    fn validates_arguments(
        #[case] page: Option<i32>,
        #[case] per_page: Option<i32>,
        #[case] expected: Option<(usize, usize)>,
    ) {
        assert_eq!(
            Arguments::new(page, per_page, 20)
                .map(|a| (a.page(), a.per_page())),
            expected,
        );
    }

    #[rstest]
    #[case(1, vec![1, 2, 3])]
    #[case(2, vec![4, 5, 6])]
    #[case(4, vec![10])]
    #[case(5, vec![])]
    #[case(100, vec![])]
    fn cuts_page(#[case] page: usize, #[case] expected: Vec<i32>) {
        let args = Arguments::new(Some(page), Some(3), 3).unwrap();

        let page = args.paginate(1..=10);

        assert_eq!(page.items, expected);
        assert_eq!(page.total_count, 10);
        assert_eq!(page.total_pages(), 4);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(20, 1)]
    #[case(21, 2)]
    #[case(40, 2)]
    #[case(41, 3)]
    fn counts_pages(#[case] len: usize, #[case] pages: usize) {
        let args = Arguments::new(None, Some(20), 20).unwrap();

        assert_eq!(args.paginate(0..len).total_pages(), pages);
    }

    #[rstest]
    #[case(0, 7)]
    #[case(1, 7)]
    #[case(13, 5)]
    #[case(49, 7)]
    #[case(50, 1)]
    fn pages_cover_list_exactly_once(#[case] len: usize, #[case] size: usize) {
        let list = (0..len).collect::<Vec<_>>();
        let total = Arguments::new(None, Some(size), size)
            .unwrap()
            .paginate(list.iter())
            .total_pages();

        let joined = (1..=total)
            .flat_map(|n| {
                Arguments::new(Some(n), Some(size), size)
                    .unwrap()
                    .paginate(list.iter().copied())
                    .items
            })
            .collect::<Vec<_>>();

        assert_eq!(joined, list);
    }

    #[test]
    fn reports_neighbours() {
        let args = Arguments::new(Some(2), Some(2), 2).unwrap();
        let page = args.paginate(1..=5);

        assert!(page.has_previous_page());
        assert!(page.has_next_page());

        let last = Arguments::new(Some(3), Some(2), 2).unwrap().paginate(1..=5);
        assert!(!last.has_next_page());
    }
}
