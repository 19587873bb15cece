//! Selector candidates for the professional-network job page layout.
//! Each list runs from the current markup to older fallbacks; order is precedence.

pub const TITLE: &[&str] = &[
    r#"h1[data-test-id="job-title"]"#,
    ".job-details-jobs-unified-top-card__job-title",
    ".top-card-layout__title",
    "h1.t-24",
    "h1",
];

pub const COMPANY: &[&str] = &[
    r#"a[data-test-id="job-details-company-link"]"#,
    ".job-details-jobs-unified-top-card__company-name",
    ".top-card-layout__card .top-card-layout__second-subline",
    ".jobs-unified-top-card__company-name",
    ".job-details-jobs-unified-top-card__primary-description-container a",
];

pub const LOCATION: &[&str] = &[
    r#"[data-test-id="job-details-location"]"#,
    ".job-details-jobs-unified-top-card__bullet",
    ".top-card-layout__card .top-card-layout__second-subline",
    ".jobs-unified-top-card__bullet",
];

pub const SALARY: &[&str] = &[
    r#"[data-test-id="job-salary-info"]"#,
    ".job-details-jobs-unified-top-card__job-insight",
    ".jobs-unified-top-card__job-insight",
];

pub const REQUIREMENTS: &[&str] = &[
    r#"[data-test-id="job-details-description"]"#,
    ".job-details-jobs-unified-top-card__job-description",
    ".jobs-description__container",
    ".show-more-less-html__markup",
    "#job-details",
];
