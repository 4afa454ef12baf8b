use crate::models::company::Company;

/// Distinct non-empty industries, in the order they first appear.
pub fn distinct_industries(companies: &[Company]) -> Vec<String> {
    let mut industries: Vec<String> = Vec::new();
    for industry in companies
        .iter()
        .filter_map(|c| c.industry.as_deref())
        .filter(|i| !i.is_empty())
    {
        if !industries.iter().any(|seen| seen == industry) {
            industries.push(industry.to_string());
        }
    }
    industries
}

/// Case-insensitive search over name, description and industry, then an
/// exact industry match. Blank inputs do not filter.
pub fn filter_companies(
    companies: Vec<Company>,
    search: Option<&str>,
    industry: Option<&str>,
) -> Vec<Company> {
    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let industry = industry.filter(|i| !i.is_empty());

    companies
        .into_iter()
        .filter(|c| match &needle {
            Some(needle) => [Some(c.name.as_str()), c.description.as_deref(), c.industry.as_deref()]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
            None => true,
        })
        .filter(|c| match industry {
            Some(industry) => c.industry.as_deref() == Some(industry),
            None => true,
        })
        .collect()
}
