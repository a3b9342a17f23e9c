/// Line that opens and closes the requested output block.
pub const DELIMITER: &str = "---";

/// One labelled section the model is asked to produce.
#[derive(Debug)]
pub struct Section {
    /// Key under which the parsed value is stored.
    pub field: &'static str,
    /// Literal label written by the model, including the trailing colon.
    pub marker: &'static str,
    /// Placeholder text shown after the marker in the prompt.
    pub hint: &'static str,
}

#[derive(Debug)]
pub struct OutputSchema {
    pub sections: &'static [Section],
    /// Text placed between sections in the format block.
    pub separator: &'static str,
}

impl OutputSchema {
    /// The block inserted into the prompt's output-format instructions.
    pub fn format_block(&self) -> String {
        let body: Vec<String> = self
            .sections
            .iter()
            .map(|s| format!("**{}** {}", s.marker, s.hint))
            .collect();
        format!("{DELIMITER}\n{}\n{DELIMITER}", body.join(self.separator))
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sections.iter().map(|s| s.field)
    }
}

pub mod fields {
    pub const RANGE: &str = "range";
    pub const CONFIDENCE: &str = "confidence";
    pub const REASONING: &str = "reasoning";

    pub const ASSESSMENT: &str = "assessment";
    pub const SCORE: &str = "score";
    pub const PRIORITY: &str = "priority";
    pub const MISSING_INFO: &str = "missing_info";

    pub const VERDICT: &str = "verdict";
    pub const RATIONALE: &str = "rationale";
}

pub static ESTIMATE: OutputSchema = OutputSchema {
    sections: &[
        Section {
            field: fields::RANGE,
            marker: "Estimated Story Point Range:",
            hint: "<range>",
        },
        Section {
            field: fields::CONFIDENCE,
            marker: "Confidence Score:",
            hint: "<score between 0 and 1>",
        },
        Section {
            field: fields::REASONING,
            marker: "Reasoning:",
            hint: "<short justification>",
        },
    ],
    separator: "\n",
};

pub static ASSESS: OutputSchema = OutputSchema {
    sections: &[
        Section {
            field: fields::ASSESSMENT,
            marker: "Business Value Assessment:",
            hint: "\n<bullet points for each factor above>",
        },
        Section {
            field: fields::SCORE,
            marker: "Business Value Score:",
            hint: "High/Medium/Low",
        },
        Section {
            field: fields::PRIORITY,
            marker: "Priority Suggestion:",
            hint: "Must-have/Should-have/Nice-to-have\nJustification: <your justification>",
        },
        Section {
            field: fields::MISSING_INFO,
            marker: "Missing Information:",
            hint: "<what is needed, or None>",
        },
    ],
    separator: "\n\n",
};

pub static CHECK: OutputSchema = OutputSchema {
    sections: &[
        Section {
            field: fields::VERDICT,
            marker: "Granular:",
            hint: "Yes/No",
        },
        Section {
            field: fields::RATIONALE,
            marker: "Rationale:",
            hint: "<brief rationale; if No, explain why and suggest how to split or rewrite the story>",
        },
    ],
    separator: "\n",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_format_block_matches_expected_layout() {
        assert_eq!(
            ESTIMATE.format_block(),
            "---\n**Estimated Story Point Range:** <range>\n**Confidence Score:** <score between 0 and 1>\n**Reasoning:** <short justification>\n---"
        );
    }

    #[test]
    fn every_marker_ends_with_colon_and_is_unique() {
        for schema in [&ESTIMATE, &ASSESS, &CHECK] {
            let markers: Vec<_> = schema.sections.iter().map(|s| s.marker).collect();
            for (i, m) in markers.iter().enumerate() {
                assert!(m.ends_with(':'), "{m} lacks a colon");
                assert!(!markers[i + 1..].contains(m), "{m} repeated");
            }
        }
    }

    #[test]
    fn fields_follow_section_order() {
        let names: Vec<_> = ASSESS.fields().collect();
        assert_eq!(
            names,
            [
                fields::ASSESSMENT,
                fields::SCORE,
                fields::PRIORITY,
                fields::MISSING_INFO
            ]
        );
    }
}
