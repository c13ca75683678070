use enlace_sql::schemas::schema::{Beneficiary, Community, Volunteer};
use enlace_types::{CommunityStats, CommunityStatsResponse};
use enlace_utils::utils::{percentage, round_two};
use std::collections::BTreeMap;

const TOTALS_LABEL: &str = "total";

fn aggregate(
    community_id: Option<i64>,
    community: &str,
    beneficiaries: &[&Beneficiary],
    volunteers: &[&Volunteer],
    share_percent: f64,
) -> CommunityStats {
    let count = beneficiaries.len() as i64;

    let ages: Vec<i32> = beneficiaries.iter().filter_map(|b| b.age).collect();
    let average_age = if ages.is_empty() {
        None
    } else {
        let sum: i64 = ages.iter().map(|age| *age as i64).sum();
        Some(round_two(sum as f64 / ages.len() as f64))
    };

    let mut by_gender = BTreeMap::new();
    for beneficiary in beneficiaries {
        *by_gender.entry(beneficiary.gender.clone()).or_insert(0) += 1;
    }

    CommunityStats {
        community_id,
        community: community.to_string(),
        beneficiaries: count,
        active_beneficiaries: beneficiaries.iter().filter(|b| b.active).count() as i64,
        average_age,
        share_percent,
        by_gender,
        volunteers: volunteers.len() as i64,
        volunteer_hours: round_two(volunteers.iter().map(|v| v.hours).sum()),
    }
}

/// Split 100% across `counts` in hundredths of a percent (largest remainder).
///
/// Each share is floored to 0.01 and the hundredths left over go to the rows
/// with the largest remainders, earlier rows first on ties, so the shares of
/// rows that cover every beneficiary add up to exactly 100.
fn apportion_shares(counts: &[i64], total: i64) -> Vec<f64> {
    if total <= 0 {
        return vec![0.0; counts.len()];
    }

    let mut hundredths: Vec<i64> = counts.iter().map(|count| count * 10_000 / total).collect();
    let target = counts.iter().sum::<i64>() * 10_000 / total;
    let leftover = (target - hundredths.iter().sum::<i64>()).max(0) as usize;

    let mut by_remainder: Vec<usize> = (0..counts.len()).collect();
    by_remainder.sort_by(|a, b| {
        let rem_a = counts[*a] * 10_000 % total;
        let rem_b = counts[*b] * 10_000 % total;
        rem_b.cmp(&rem_a).then(a.cmp(b))
    });

    for index in by_remainder.into_iter().take(leftover) {
        hundredths[index] += 1;
    }

    hundredths
        .into_iter()
        .map(|value| value as f64 / 100.0)
        .collect()
}

/// Per community aggregates, ordered by community name, plus a totals row
pub fn summarize(
    communities: &[Community],
    beneficiaries: &[Beneficiary],
    volunteers: &[Volunteer],
) -> CommunityStatsResponse {
    let total = beneficiaries.len() as i64;

    let mut ordered: Vec<&Community> = communities.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    let members: Vec<Vec<&Beneficiary>> = ordered
        .iter()
        .map(|community| {
            beneficiaries
                .iter()
                .filter(|b| b.community_id == community.id)
                .collect()
        })
        .collect();

    let counts: Vec<i64> = members.iter().map(|m| m.len() as i64).collect();
    let shares = apportion_shares(&counts, total);

    let rows = ordered
        .into_iter()
        .zip(members.iter())
        .zip(shares)
        .map(|((community, members), share)| {
            let helpers: Vec<&Volunteer> = volunteers
                .iter()
                .filter(|v| v.community_id == Some(community.id))
                .collect();
            aggregate(Some(community.id), &community.name, members, &helpers, share)
        })
        .collect();

    let all_members: Vec<&Beneficiary> = beneficiaries.iter().collect();
    let all_helpers: Vec<&Volunteer> = volunteers.iter().collect();

    CommunityStatsResponse {
        communities: rows,
        totals: aggregate(
            None,
            TOTALS_LABEL,
            &all_members,
            &all_helpers,
            percentage(total, total),
        ),
    }
}
