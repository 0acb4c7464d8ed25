//! Client-side search and sort over joined case views.

use casetrack_dashboard_models::{CaseSortField, CaseView, SortDirection};

/// Filters case views by a search term and sorts them.
///
/// Search is a case-insensitive substring match over the report title,
/// crime type, assigned officer's name, and case id; a view matches if
/// any of those contains the term. A blank term matches everything.
///
/// Sorting compares the selected field case-insensitively; views missing
/// the field compare as the empty string, which sorts first ascending.
/// Pure and idempotent: re-applying with the same parameters returns the
/// same ordering.
#[must_use]
pub fn filter_and_sort_cases(
    views: Vec<CaseView>,
    search: &str,
    sort: CaseSortField,
    direction: SortDirection,
) -> Vec<CaseView> {
    let term = search.trim().to_lowercase();

    let mut out: Vec<CaseView> = if term.is_empty() {
        views
    } else {
        views
            .into_iter()
            .filter(|view| matches_search(view, &term))
            .collect()
    };

    out.sort_by(|a, b| {
        let ord = sort_key(a, sort).cmp(&sort_key(b, sort));
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    out
}

/// Returns whether any searchable field of the view contains the
/// (already lowercased) term.
fn matches_search(view: &CaseView, term: &str) -> bool {
    [
        view.title.as_str(),
        view.crime_type.as_str(),
        view.officer_name.as_str(),
        view.case.id.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(term))
}

/// Extracts the (lowercased) comparison key for a sort field.
fn sort_key(view: &CaseView, sort: CaseSortField) -> String {
    match sort {
        CaseSortField::CaseId => view.case.id.to_lowercase(),
        CaseSortField::CrimeType => view.crime_type.to_lowercase(),
        CaseSortField::Title => view.title.to_lowercase(),
        CaseSortField::Officer => view.officer_name.to_lowercase(),
        CaseSortField::Progress => view.case.progress.to_string().to_lowercase(),
        CaseSortField::LastUpdated => view.case.updated_at.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casetrack_case_models::{Case, CasePriority, CaseProgress, CaseStatus};

    fn view(id: &str, title: &str, crime_type: &str, officer: &str, updated_at: &str) -> CaseView {
        CaseView {
            case: Case {
                id: id.to_string(),
                report_id: format!("r-{id}"),
                assigned_officer_id: None,
                progress: CaseProgress::Pending,
                status: CaseStatus::UnderInvestigation,
                station: "st-01".to_string(),
                priority: CasePriority::Medium,
                created_at: updated_at.to_string(),
                updated_at: updated_at.to_string(),
                submitted_to_judiciary: false,
                judiciary_status: None,
            },
            title: title.to_string(),
            crime_type: crime_type.to_string(),
            officer_name: officer.to_string(),
        }
    }

    fn sample() -> Vec<CaseView> {
        vec![
            view("c-3", "Warehouse arson", "Arson", "Achieng", "2025-03-03T10:00:00+00:00"),
            view("c-1", "Stolen bicycle", "Theft", "Barasa", "2025-03-01T10:00:00+00:00"),
            view("c-2", "Market brawl", "Assault", "Chebet", "2025-03-02T10:00:00+00:00"),
        ]
    }

    #[test]
    fn search_matches_any_field_case_insensitively() {
        let mut views = sample();
        views.push(view(
            "c-4",
            "Kiosk arson attempt",
            "Arson",
            "Barasa",
            "2025-03-04T10:00:00+00:00",
        ));

        let hits = filter_and_sort_cases(views, "ARSON", CaseSortField::Title, SortDirection::Asc);
        assert_eq!(hits.len(), 2);
        // Ordered by title ascending: "Kiosk..." before "Warehouse...".
        assert_eq!(hits[0].case.id, "c-4");
        assert_eq!(hits[1].case.id, "c-3");

        // Officer name and case id are searchable too.
        let by_officer =
            filter_and_sort_cases(sample(), "chebet", CaseSortField::Title, SortDirection::Asc);
        assert_eq!(by_officer.len(), 1);
        assert_eq!(by_officer[0].case.id, "c-2");

        let by_id =
            filter_and_sort_cases(sample(), "c-1", CaseSortField::Title, SortDirection::Asc);
        assert_eq!(by_id.len(), 1);
    }

    #[test]
    fn blank_search_keeps_everything() {
        let all = filter_and_sort_cases(
            sample(),
            "  ",
            CaseSortField::LastUpdated,
            SortDirection::Desc,
        );
        assert_eq!(all.len(), 3);
        // Default ordering leads with the most recently updated case.
        assert_eq!(all[0].case.id, "c-3");
    }

    #[test]
    fn idempotent_under_reapplication() {
        let once = filter_and_sort_cases(sample(), "a", CaseSortField::Title, SortDirection::Asc);
        let twice = filter_and_sort_cases(once.clone(), "a", CaseSortField::Title, SortDirection::Asc);
        assert_eq!(once, twice);
    }

    #[test]
    fn descending_is_reverse_of_ascending_for_lexical_fields() {
        for field in [
            CaseSortField::CaseId,
            CaseSortField::Title,
            CaseSortField::Officer,
            CaseSortField::LastUpdated,
        ] {
            let asc = filter_and_sort_cases(sample(), "", field, SortDirection::Asc);
            let mut reversed = asc.clone();
            reversed.reverse();
            let desc = filter_and_sort_cases(sample(), "", field, SortDirection::Desc);
            assert_eq!(desc, reversed, "field {field:?}");
        }
    }

    #[test]
    fn missing_values_sort_first_ascending() {
        let mut views = sample();
        views.push(view("c-4", "", "", "", "2025-03-04T10:00:00+00:00"));

        let sorted =
            filter_and_sort_cases(views, "", CaseSortField::Officer, SortDirection::Asc);
        // The unassigned case's empty officer name sorts before any name.
        assert_eq!(sorted[0].case.id, "c-4");
    }
}
