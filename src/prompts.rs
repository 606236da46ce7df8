// Instruction templates for each analysis the dashboard offers.
//
// Every system prompt asks the model to plan inside <thinking> tags and put
// the user-facing text inside <answer> tags; see `answer::extract_answer`.

use crate::corpus::PromptBundle;
use crate::schema::{PerformanceTopic, ThemeKind};

const ANSWER_FORMAT: &str = "After reviewing the relevant information, organize your thoughts within \
<thinking></thinking> tags, then present your final analysis to the user within <answer></answer> tags.";

const CITATION_RULES: &str = r#"
IMPORTANT RULES:
- Analyze each quarter in a separate paragraph, starting with the most recent quarter.
- Do not write the words "Point" or "Evidence" in the final response.
- Cover every fund that appears in the insights for a quarter. Do not skip any funds.
- Cite examples as [Fund Name, Quarter].
"#;

const SINGLE_FUND_RULES: &str = r#"
IMPORTANT RULES:
- Prefer the most recent letter when letters disagree.
- Do not speculate beyond what the letters state.
- Call out any limitation caused by missing context or evidence.
"#;

/// Performance Pulse: one topic summarised across funds and quarters. The
/// corpus is an [`insight_digest`](crate::corpus::insight_digest).
pub fn cross_fund_performance(topic: PerformanceTopic, digest: impl Into<String>) -> PromptBundle {
    let label = topic.label();

    let (instruction, system) = match topic {
        PerformanceTopic::PortfolioPositioning => (
            format!(
                "Summarize the key portfolio positioning changes and adjustments made by the selected hedge funds \
                 over the period. For each quarter, make one clear point about the main changes and name the \
                 letters it draws on, support it with specific equity positions and figures, then explain how the \
                 changes fit each fund's philosophy and the market backdrop and whether later performance \
                 vindicated them. When several funds are selected, close with the common themes and divergences. \
                 Write full paragraphs rather than bullet lists.\n{}",
                CITATION_RULES
            ),
            format!(
                "You are an experienced investment analyst reviewing the '{}' sections extracted from the \
                 quarterly partner letters of several hedge funds. Identify significant shifts in strategy, \
                 sector exposure and individual positions, support each observation with the fund and quarter it \
                 came from, and highlight common themes and notable contrasts between the funds. {}",
                label, ANSWER_FORMAT
            ),
        ),
        _ => (
            format!(
                "Give a high-level overview of the main {label} across the selected hedge funds and quarters. For \
                 each quarter, make one clear point about the main {label}, back it with specific examples that \
                 name the fund, then explain why those stocks or sectors did well or poorly. When several funds \
                 are selected, close with the common themes and divergences across the whole period.\n{}",
                CITATION_RULES
            ),
            format!(
                "You are an experienced investment analyst reviewing quarterly hedge fund partner letters. The \
                 '{label}' section of each letter has been extracted and aggregated for you. Describe the overall \
                 trends, support them with examples cited by fund and quarter, explain the reasons behind the \
                 {label}, and compare the funds throughout. {}",
                ANSWER_FORMAT
            ),
        ),
    };

    PromptBundle::new(instruction, system, digest)
}

/// Market Mood Monitor: selected themes across the tagged letters.
pub fn theme_analysis(kind: ThemeKind, themes: &[String], corpus: impl Into<String>) -> PromptBundle {
    let theme_list = themes.join(", ");
    let area = kind.label().to_lowercase();

    let instruction = format!(
        "Provide a detailed overview of the {theme_list} themes discussed in the attached partner letters, as \
         clear and structured bullet points. Highlight the key points each letter makes and compare and contrast \
         the funds and quarters. Cite the source of every view by putting the letter title in brackets, like \
         this: [Greenlight Capital 2023 Q4]."
    );
    let system = format!(
        "You are an experienced investment analyst with a deep understanding of {area} themes. The attached \
         quarterly partner letters are each wrapped in XML tags naming the fund and quarter. Hedge funds use these \
         letters to discuss performance, macroeconomic views and the rationale for their positions. Read every \
         letter in full and find the commentary most relevant to: {theme_list}. Plan your answer and the data you \
         will use inside <thinking></thinking> tags, which are not shown to the user, then write the final answer \
         inside <answer></answer> tags without any other tag sections."
    );

    PromptBundle::new(instruction, system, corpus)
}

/// Specific Funds: one performance topic for a single fund across its letters.
pub fn fund_performance(fund: &str, topic: PerformanceTopic, corpus: impl Into<String>) -> PromptBundle {
    let (instruction, system) = match topic {
        PerformanceTopic::KeyContributors => (
            format!(
                "Analyze the key positive contributors to {fund}'s performance across the attached quarterly \
                 letters. Identify the stocks, sectors, strategies or positions that drove outperformance each \
                 quarter, cite the quarter for every piece of evidence, and contrast how each contributor fared \
                 across quarters, explaining the market conditions behind any divergence."
            ),
            format!(
                "You are reviewing the quarterly letters from {fund} to find its top 3 positive performance \
                 contributors; return fewer if the letters do not support three. For each contributor give a one \
                 or two sentence summary, the quarters in which it outperformed with supporting evidence, and the \
                 rationale for its outperformance.\n{SINGLE_FUND_RULES}\n{ANSWER_FORMAT}"
            ),
        ),
        PerformanceTopic::KeyDetractors => (
            format!(
                "Analyze the key detractors from {fund}'s performance across the attached quarterly letters. \
                 Identify the stocks, sectors, strategies or positions that hurt performance each quarter, cite \
                 the quarter for every piece of evidence, and contrast how each detractor fared across quarters, \
                 explaining the market conditions behind any divergence."
            ),
            format!(
                "You are reviewing the quarterly letters from {fund} to find its top 3 performance detractors; \
                 return fewer if the letters do not support three. For each detractor give a one or two sentence \
                 summary, the quarters in which it underperformed with supporting evidence, and the rationale for \
                 its underperformance.\n{SINGLE_FUND_RULES}\n{ANSWER_FORMAT}"
            ),
        ),
        PerformanceTopic::PortfolioPositioning => (
            format!(
                "Summarize the key portfolio positioning changes made by {fund} across the attached quarterly \
                 letters: shifts in strategy, sector exposure, market cap focus, investment theses and notable \
                 individual positions. Back every summary point with evidence cited by quarter, and assess the \
                 rationale and effectiveness of major adjustments where the letters allow."
            ),
            format!(
                "You are an experienced investment analyst reviewing the portfolio positioning described in the \
                 quarterly letters of the hedge fund {fund}. Read the letters chronologically, distil the changes \
                 into a few high-level summary points, give the supporting evidence with its quarter right after \
                 each point, and analyze the rationale and impact of major adjustments. Note shifts such as moves \
                 between small and large caps, value and growth, fixed income, shorting or thematic bets. Finish \
                 with the limitations of the analysis.\n{ANSWER_FORMAT}"
            ),
        ),
    };

    PromptBundle::new(instruction, system, corpus)
}

/// Specific Funds: a free-form question over one fund's letters.
pub fn fund_question(fund: &str, question: &str, corpus: impl Into<String>) -> PromptBundle {
    let system = format!(
        "You are an experienced investment analyst reviewing the quarterly partner letters from the hedge fund \
         {fund}. The user has asked the following question: \"{question}\". Analyze the attached letters, extract \
         the insights relevant to the question and give a comprehensive response that cites specific examples \
         from the letters. {ANSWER_FORMAT}"
    );
    PromptBundle::new(question, system, corpus)
}

/// Specific VC Funds: a free-form question over a single venture letter.
pub fn venture_question(fund: &str, question: &str, corpus: impl Into<String>) -> PromptBundle {
    let system = format!(
        "You are an experienced venture capital analyst reviewing the quarterly letter from the VC fund {fund}. \
         Venture funds invest in early-stage, high-growth companies and write quarterly letters to update their \
         limited partners on performance, portfolio companies and market views. Answer the user's question about \
         the attached letter as well as you can, citing specific examples from it, and present a well-organized \
         final analysis."
    );
    let instruction = format!(
        "This is the user's question:\n<user_input>\n{question}\n</user_input>\n\nPlease give a detailed, \
         well-structured answer based on the quarterly letter from {fund}, citing your sources correctly."
    );
    PromptBundle::new(instruction, system, corpus)
}
