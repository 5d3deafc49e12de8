use serde::Serialize;

use crate::utils::validation::ValidationErrors;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sortable columns exposed through `sortBy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Id,
    Title,
    #[default]
    EventDate,
    Location,
    Organizer,
    Category,
    Status,
    MaxCapacity,
    CurrentRegistrations,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn from_param(value: &str) -> Option<Self> {
        let field = match value.trim() {
            "id" => SortField::Id,
            "title" => SortField::Title,
            "eventDate" => SortField::EventDate,
            "location" => SortField::Location,
            "organizer" => SortField::Organizer,
            "category" => SortField::Category,
            "status" => SortField::Status,
            "maxCapacity" => SortField::MaxCapacity,
            "currentRegistrations" => SortField::CurrentRegistrations,
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            _ => return None,
        };
        Some(field)
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::EventDate => "event_date",
            SortField::Location => "location",
            SortField::Organizer => "organizer",
            SortField::Category => "category",
            SortField::Status => "status",
            SortField::MaxCapacity => "max_capacity",
            SortField::CurrentRegistrations => "current_registrations",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Anything other than `DESC` sorts ascending.
    pub fn from_param(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: SortField::default(),
            direction: SortDirection::default(),
        }
    }
}

impl PageRequest {
    pub fn new(
        page: Option<u32>,
        size: Option<u32>,
        sort_by: Option<&str>,
        sort_direction: Option<&str>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
        if size == 0 || size > MAX_PAGE_SIZE {
            errors.add("size", format!("must be between 1 and {}", MAX_PAGE_SIZE));
        }

        let sort = match sort_by {
            Some(value) => SortField::from_param(value).unwrap_or_else(|| {
                errors.add("sortBy", format!("cannot sort by '{}'", value));
                SortField::default()
            }),
            None => SortField::default(),
        };

        errors.into_result()?;

        Ok(Self {
            page: page.unwrap_or(0),
            size,
            sort,
            direction: sort_direction
                .map(SortDirection::from_param)
                .unwrap_or_default(),
        })
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

/// One slice of a sorted result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size.max(1));
        let total_pages = total_elements.div_ceil(size);
        let page = request.page;

        Self {
            content,
            page,
            size: request.size,
            total_elements,
            total_pages,
            first: page == 0,
            last: u64::from(page) + 1 >= total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}
