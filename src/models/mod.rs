//! Data models for the indexing backend's REST responses.

mod matching;
mod nas;
mod pattern;
mod udm;

pub use matching::{
    Coverage, FileMatchCounts, FileSegments, MatchingCounts, MatchingItem, MatchingMatrix,
    MatchingStats, MatchingStatus, NasFileInfo, SegmentDetail, SegmentMatchCounts,
    SegmentMetadata, SegmentRecord, SegmentSource, SegmentSummary, SourceStats, TimeRange,
    UdmLink, UdmStatus, ValidationWarning,
};
pub use nas::{NasFile, NasFileList, NasFolder, NasFolderTree, ScanMode, ScanResult, ScanStatus};
pub use pattern::{
    ExtractedFields, PatternInfo, PatternList, PatternMatchDetail, PatternRefresh, PatternStats,
    PatternTestRequest, PatternTestResponse, UnmatchedFile, UnmatchedFiles,
};
pub use udm::{
    Asset, AssetSummary, EventContext, FileNameMeta, FullAssets, LoadResult, PlayerInHand,
    Segment, SituationFlags, TechSpec, UdmDocument, UdmFilters, UdmMetadata, UdmStats,
};
