/*!
# Development-Activity Dashboard

A browser-based dashboard over software-development activity data, built in Rust.

## Overview

The application ingests a CSV file describing development activity - dates,
new/completed task counts, developer effort hours, and task status - and
renders derived charts, KPI summary cards, and a data table, with a trailing
period filter and a selectable time-series granularity. The dataset lives
purely in memory for the lifetime of the server process; each upload replaces
it wholesale.

## Architecture

The application follows a client-server architecture:

### Frontend Layer
- **Technologies**: HTML, CSS, JavaScript
- **Key Components**:
  - Upload form - Posts the CSV file to the backend
  - Period/bucket selectors - Re-request the derived views on change
  - KPI cards, chart images, and data table - Render the API responses

### Backend Layer
- **Technologies**: Rust, axum
- **Core Components**:
  - Record Store - Holds the current dataset, replaced atomically per upload
  - CSV Ingestor - Parses and validates uploads, all-or-nothing
  - Period Filter - Trailing-window subset relative to the latest date
  - Aggregator - Time series, status distribution, developer effort, KPIs
  - Chart Renderer - PNG charts via plotters
  - CSV Exporter - Round-trippable download of the filtered rows

Every recomputation is a fresh, total function of (stored records, selected
period); there is no incremental state and no persistence across restarts.

## Modules

- **record**: Activity record types and the in-memory record store
- **ingest**: CSV upload parsing and schema validation
- **filter**: Trailing-window period filter
- **aggregate**: The four derived views (time series, status, effort, KPIs)
- **graph**: Chart generation from the aggregated views
- **export**: CSV export of the filtered record set
- **app**: Routing and request handlers

## REST API Endpoints

- `GET /` - Dashboard page
- `POST /api/upload` - Replace the dataset with an uploaded CSV
- `GET /api/dashboard?window=&bucket=` - All derived views as JSON
- `GET /api/export?window=` - Filtered rows as a CSV attachment
- `GET /charts/timeseries.png?window=&bucket=` - Time-series line chart
- `GET /charts/status.png?window=` - Status pie chart
- `GET /charts/effort.png?window=` - Developer effort bar chart
*/

pub mod aggregate;
pub mod app;
pub mod export;
pub mod filter;
pub mod graph;
pub mod ingest;
pub mod record;

pub use aggregate::{Bucket, DeveloperEffort, KpiSummary, StatusCount, TimeSeriesPoint};
pub use ingest::{IngestError, ingest};
pub use record::{ActivityRecord, RecordSet, RecordStore};
