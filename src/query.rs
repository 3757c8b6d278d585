use crate::types::{DatasetSnapshot, DepartmentSummary, FilterSpec, KpiRecord, Status};
use crate::util::average;

/// Case-insensitive substring test; an empty term matches everything.
fn matches_search(name: &str, term: &str) -> bool {
    term.is_empty() || name.to_lowercase().contains(&term.to_lowercase())
}

pub fn matches(kpi: &KpiRecord, spec: &FilterSpec) -> bool {
    spec.department.matches(&kpi.department)
        && spec.section.matches(&kpi.section)
        && matches_search(&kpi.kpi_name, &spec.search_term)
        && (!spec.show_only_complete || kpi.is_complete)
}

/// Records passing every criterion of `spec`, in their original order.
pub fn filter_kpis<'a>(kpis: &'a [KpiRecord], spec: &FilterSpec) -> Vec<&'a KpiRecord> {
    kpis.iter().filter(|k| matches(k, spec)).collect()
}

/// One summary per catalog department, in catalog order, including departments with no rows.
///
/// Independent of any filter. The average only covers complete records.
pub fn summarize_departments(snapshot: &DatasetSnapshot) -> Vec<DepartmentSummary> {
    snapshot
        .departments
        .iter()
        .map(|dept| {
            let mut total = 0usize;
            let mut complete: Vec<f64> = Vec::new();
            for k in snapshot.kpis.iter().filter(|k| &k.department == dept) {
                total += 1;
                if k.is_complete {
                    complete.push(k.improvement);
                }
            }
            let avg_improvement = average(&complete);
            DepartmentSummary {
                department: dept.clone(),
                total_kpis: total,
                complete_kpis: complete.len(),
                avg_improvement,
                status: Status::for_department(avg_improvement),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Selection;
    use chrono::Utc;

    fn kpi(id: usize, name: &str, dept: &str, section: &str, improvement: f64) -> KpiRecord {
        let is_complete = improvement != 0.0;
        KpiRecord {
            id,
            section: section.into(),
            kpi_name: name.into(),
            value_2024: if is_complete { 100.0 } else { 0.0 },
            value_2025: if is_complete { 100.0 + improvement } else { 0.0 },
            improvement,
            department: dept.into(),
            is_complete,
            status: Status::for_kpi(improvement),
        }
    }

    fn sample() -> Vec<KpiRecord> {
        vec![
            kpi(1, "KPI A Something", "Media", "Outputs", 50.0),
            kpi(2, "Followers", "Media", "Outcomes", 0.0),
            kpi(3, "Campaign reach", "Marketing", "Outputs", -10.0),
            kpi(4, "Press coverage", "Media", "Outputs", 10.0),
        ]
    }

    fn ids(v: &[&KpiRecord]) -> Vec<usize> {
        v.iter().map(|k| k.id).collect()
    }

    #[test]
    fn test_default_spec_is_identity() {
        let data = sample();
        let out = filter_kpis(&data, &FilterSpec::default());
        assert_eq!(ids(&out), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_filter_department_and_section() {
        let data = sample();
        let spec = FilterSpec {
            department: Selection::Only("Media".into()),
            section: Selection::Only("Outputs".into()),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&filter_kpis(&data, &spec)), vec![1, 4]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let data = sample();
        let spec = FilterSpec {
            search_term: "kpi a".into(),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&filter_kpis(&data, &spec)), vec![1]);
    }

    #[test]
    fn test_only_complete() {
        let data = sample();
        let spec = FilterSpec {
            show_only_complete: true,
            ..FilterSpec::default()
        };
        assert_eq!(ids(&filter_kpis(&data, &spec)), vec![1, 3, 4]);
    }

    #[test]
    fn test_unknown_department_matches_nothing() {
        let data = sample();
        let spec = FilterSpec {
            department: Selection::Only("Nope".into()),
            ..FilterSpec::default()
        };
        assert!(filter_kpis(&data, &spec).is_empty());
    }

    #[test]
    fn test_summaries_follow_catalog_order() {
        let snapshot = DatasetSnapshot {
            kpis: sample(),
            departments: vec!["Marketing".into(), "Protocol".into(), "Media".into()],
            sections: vec![],
            last_updated: Utc::now(),
        };
        let summaries = summarize_departments(&snapshot);
        let names: Vec<&str> = summaries.iter().map(|s| s.department.as_str()).collect();
        assert_eq!(names, vec!["Marketing", "Protocol", "Media"]);

        let marketing = &summaries[0];
        assert_eq!(marketing.total_kpis, 1);
        assert_eq!(marketing.avg_improvement, -10.0);
        assert_eq!(marketing.status, Status::NeedsImprovement);

        let protocol = &summaries[1];
        assert_eq!(protocol.total_kpis, 0);
        assert_eq!(protocol.complete_kpis, 0);
        assert_eq!(protocol.avg_improvement, 0.0);
        assert_eq!(protocol.status, Status::NeedsImprovement);

        let media = &summaries[2];
        assert_eq!(media.total_kpis, 3);
        assert_eq!(media.complete_kpis, 2);
        assert_eq!(media.avg_improvement, 30.0);
        assert_eq!(media.status, Status::Excellent);
    }
}
