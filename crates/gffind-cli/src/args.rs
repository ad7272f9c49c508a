//! Query flags and their mapping onto a [`QueryIntent`].

use clap::{Args, ValueEnum};

use gffind::{
    parse_attribute_filters, parse_attribute_list, FixedField, GffResult, QueryIntent,
    RegionFilter, RegionMode, ReturnField, DEFAULT_TABLE,
};

/// Column groups accepted by `--return`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReturnArg {
    Seqid,
    Source,
    Type,
    /// Both beginning and end.
    Region,
    Beginning,
    End,
    Score,
    Strand,
    Phase,
}

impl From<ReturnArg> for ReturnField {
    fn from(arg: ReturnArg) -> Self {
        let fixed = match arg {
            ReturnArg::Region => return ReturnField::Region,
            ReturnArg::Seqid => FixedField::Seqid,
            ReturnArg::Source => FixedField::Source,
            ReturnArg::Type => FixedField::Type,
            ReturnArg::Beginning => FixedField::Beginning,
            ReturnArg::End => FixedField::End,
            ReturnArg::Score => FixedField::Score,
            ReturnArg::Strand => FixedField::Strand,
            ReturnArg::Phase => FixedField::Phase,
        };
        ReturnField::Fixed(fixed)
    }
}

/// Filters and return columns for `gffind query`.
#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Table to query.
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Result file stem (".txt" is appended; taken names get a numeric suffix).
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// Match features on this sequence (e.g. "chr1").
    #[arg(long)]
    pub seqid: Option<String>,

    /// Match features from this source.
    #[arg(long)]
    pub source: Option<String>,

    /// Match features of this type (e.g. "gene").
    #[arg(long = "type")]
    pub feature_type: Option<String>,

    /// Match features with this score.
    #[arg(long)]
    pub score: Option<String>,

    /// Match features on this strand (+, -, . or ?).
    #[arg(long)]
    pub strand: Option<String>,

    /// Match features with this phase (0, 1, 2 or .).
    #[arg(long)]
    pub phase: Option<String>,

    /// Attribute filters, e.g. 'ID=gene1;Name=foo'.
    #[arg(long)]
    pub attribute: Option<String>,

    /// Features contained within BEGIN-END.
    #[arg(long, value_name = "BEGIN-END",
          conflicts_with_all = ["region_beginning", "region_end", "region_span"])]
    pub region_contained: Option<String>,

    /// Features that begin within BEGIN-END and end after it.
    #[arg(long, value_name = "BEGIN-END",
          conflicts_with_all = ["region_contained", "region_end", "region_span"])]
    pub region_beginning: Option<String>,

    /// Features that begin before BEGIN-END and end within it.
    #[arg(long, value_name = "BEGIN-END",
          conflicts_with_all = ["region_contained", "region_beginning", "region_span"])]
    pub region_end: Option<String>,

    /// Features that span BEGIN-END.
    #[arg(long, value_name = "BEGIN-END",
          conflicts_with_all = ["region_contained", "region_beginning", "region_end"])]
    pub region_span: Option<String>,

    /// Columns to return (comma-separated or repeated).
    #[arg(long = "return", value_enum, value_delimiter = ',')]
    pub returns: Vec<ReturnArg>,

    /// Attribute columns to return, e.g. 'ID;Name'.
    #[arg(long)]
    pub return_attributes: Option<String>,

    /// Return every column.
    #[arg(long, short = 'a')]
    pub all: bool,
}

impl QueryArgs {
    /// Build the query intent. The table defaults to `gff`.
    pub fn into_intent(self) -> GffResult<QueryIntent> {
        let mut intent = QueryIntent {
            query_table_name: Some(self.name.unwrap_or_else(|| DEFAULT_TABLE.to_string())),
            output_name: self.output,
            return_all: self.all,
            ..Default::default()
        };

        let fields = [
            (FixedField::Seqid, self.seqid),
            (FixedField::Source, self.source),
            (FixedField::Type, self.feature_type),
            (FixedField::Score, self.score),
            (FixedField::Strand, self.strand),
            (FixedField::Phase, self.phase),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                intent.field_filters.insert(field, value);
            }
        }

        if let Some(text) = &self.attribute {
            intent.attribute_filters = parse_attribute_filters(text)?;
        }

        let regions = [
            (RegionMode::Contained, self.region_contained),
            (RegionMode::Beginning, self.region_beginning),
            (RegionMode::End, self.region_end),
            (RegionMode::Span, self.region_span),
        ];
        for (mode, range) in regions {
            if let Some(range) = range {
                intent.region_filter = Some(RegionFilter::parse(mode, &range)?);
            }
        }

        intent.return_fields = self.returns.into_iter().map(ReturnField::from).collect();
        if let Some(text) = &self.return_attributes {
            intent.return_fields.extend(parse_attribute_list(text));
        }

        Ok(intent)
    }
}
