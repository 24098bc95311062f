use crate::responses::Article;
use analytics::SummaryStats;

/// Builds the advisor prompt from the news articles and the window's figures.
pub fn build_prompt(articles: &[Article], stats: &SummaryStats) -> String {
    let news = serde_json::to_string_pretty(articles).unwrap_or_else(|_| "[]".to_string());
    format!(
        "You are an expert business advisor for a small business.
I will give you the latest financial news and my business performance data.
Your job is to provide 3-5 short, actionable bullet points of advice.

--- LATEST NEWS ---
{news}

--- MY BUSINESS DATA (Last 30 Days) ---
Total Revenue: {:.2}
Total Expenditure: {:.2}
Net Profit: {:.2}
Average Daily Revenue: {:.2}

--- YOUR ADVICE ---
Based on the news and my performance, what should I be cautious about or what opportunities should I look for?
",
        stats.total_revenue, stats.total_expenditure, stats.net_profit, stats.avg_revenue,
    )
}
